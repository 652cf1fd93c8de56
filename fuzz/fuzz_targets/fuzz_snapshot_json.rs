#![no_main]

use libfuzzer_sys::fuzz_target;
use pagepick::snapshot;
use pagepick::{Picker, PickerConfig};

fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }

    // Parsing must never panic; errors are fine.
    let Ok(parsed) = snapshot::from_reader(data) else {
        return;
    };

    let ids: Vec<String> = parsed.store.records().iter().map(|r| r.id.clone()).collect();
    let mut picker = Picker::new(PickerConfig::default());
    picker.load(parsed.connection_id(), parsed.store.clone());

    // Bound ids are locked from the start.
    let bound = parsed.store.bound_ids();
    for id in &bound {
        assert!(picker.selection().contains(id));
        assert!(picker.disabled().contains(id));
    }

    picker.expand_all();
    for id in ids.iter().take(64) {
        picker.toggle_select(id);
        let _ = picker.preview(id);
    }
    for id in &bound {
        assert!(picker.selection().contains(id), "bound id {id} was deselected");
    }

    let count = picker.rows().count();
    assert!(count <= ids.len());
    let drawn = picker.window(280).count();
    assert!(drawn <= count);
});
