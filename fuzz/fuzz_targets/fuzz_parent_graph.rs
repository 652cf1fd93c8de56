#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pagepick::{Picker, PickerConfig, ROOT_PARENT, Record, RecordStore};

#[derive(Debug, Arbitrary)]
enum Op {
    Expand(u8),
    Select(u8),
    Query(u8),
    ClearQuery,
    Scroll(i16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    /// Parent slot per record; values past the record count mean top level.
    parents: Vec<u8>,
    /// Id slot per record, wrapped to the record count; missing entries use
    /// the record's own position.
    ids: Vec<u8>,
    single: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let len = input.parents.len().min(128);
    if len == 0 {
        return;
    }

    // Arbitrary parent pointers, cycles, self-parents and repeated ids included.
    let records: Vec<Record> = input.parents[..len]
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let parent = if usize::from(p) < len {
                format!("n{p}")
            } else {
                ROOT_PARENT.to_owned()
            };
            let slot = input.ids.get(i).map_or(i, |&id| usize::from(id) % len);
            Record::new(format!("n{slot}"), format!("Node {i}")).with_parent(parent)
        })
        .collect();

    let config = if input.single {
        PickerConfig::default().with_choice(pagepick::ChoiceMode::Single)
    } else {
        PickerConfig::default()
    };
    let mut picker = Picker::new(config);
    picker.load("fuzz", RecordStore::from_records(records, "fuzz"));

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Expand(i) => {
                picker.toggle_expand(&format!("n{}", usize::from(i) % len));
            }
            Op::Select(i) => {
                picker.toggle_select(&format!("n{}", usize::from(i) % len));
            }
            Op::Query(i) => picker.set_query(format!("{}", usize::from(i) % len)),
            Op::ClearQuery => picker.set_query(""),
            Op::Scroll(delta) => picker.rows_mut().scroll_by(i64::from(delta), 280),
        }

        assert!(picker.rows().count() <= len);
        if input.single {
            assert!(picker.selection().len() <= 1);
        }
        let _ = picker.window(280).count();
    }
});
