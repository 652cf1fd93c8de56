//! End-to-end picker scenarios over the public API.

use pagepick::search::search;
use pagepick::selection::toggle;
use pagepick::{
    ChildIndex, ChoiceMode, ExpansionState, MatchCase, Picker, PickerConfig, Record, RecordStore,
    Selection, SelectionMode, TreeIndex, ViewMode, build_visible,
};

fn three_levels() -> RecordStore {
    RecordStore::from_records(
        vec![
            Record::new("root-1", "Root 1"),
            Record::new("child-1", "Child 1").with_parent("root-1"),
            Record::new("grandchild-1", "Grandchild 1").with_parent("child-1"),
        ],
        "workspace-1",
    )
}

fn ids(rows: &[pagepick::Row]) -> Vec<&str> {
    rows.iter().map(|row| row.id.as_str()).collect()
}

#[test]
fn expanding_level_by_level() {
    let store = three_levels();
    let tree = TreeIndex::for_store(&store);
    let children = ChildIndex::build(&store);

    let expanded = ExpansionState::new();
    assert_eq!(ids(&build_visible(&children, &expanded)), ["root-1"]);

    let expanded = expanded.toggled("root-1", &tree);
    assert_eq!(ids(&build_visible(&children, &expanded)), ["root-1", "child-1"]);

    let expanded = expanded.toggled("child-1", &tree);
    assert_eq!(
        ids(&build_visible(&children, &expanded)),
        ["root-1", "child-1", "grandchild-1"]
    );
}

#[test]
fn subtree_toggle_selects_and_clears() {
    let store = three_levels();
    let tree = TreeIndex::for_store(&store);
    let mode = SelectionMode::new(ChoiceMode::Multiple, ViewMode::Tree);
    let none = Selection::new();

    let selected = toggle("root-1", &none, mode, &tree, &none);
    let expected: Selection = ["root-1", "child-1", "grandchild-1"].into_iter().collect();
    assert_eq!(selected, expected);

    assert!(toggle("root-1", &selected, mode, &tree, &none).is_empty());
}

#[test]
fn search_returns_breadcrumbed_match() {
    let store = three_levels();
    let tree = TreeIndex::for_store(&store);
    let rows = search(store.records(), &tree, "Grandchild", MatchCase::Sensitive);
    assert_eq!(ids(&rows), ["grandchild-1"]);
    assert_eq!(
        rows[0].breadcrumb.as_deref(),
        Some("Root 1 / Child 1 / Grandchild 1")
    );
}

#[test]
fn single_choice_swaps_selection() {
    let store = RecordStore::from_records(
        vec![Record::new("page-1", "Page 1"), Record::new("page-2", "Page 2")],
        "ws",
    );
    let tree = TreeIndex::for_store(&store);
    let mode = SelectionMode::new(ChoiceMode::Single, ViewMode::Tree);
    let current: Selection = ["page-1"].into_iter().collect();
    let next = toggle("page-2", &current, mode, &tree, &Selection::new());
    assert_eq!(next.iter().collect::<Vec<_>>(), ["page-2"]);
}

#[test]
fn orphan_lands_at_top_level() {
    let store = RecordStore::from_records(
        vec![
            Record::new("page-1", "Page 1"),
            Record::new("orphan", "Orphan").with_parent("missing-id"),
        ],
        "ws",
    );
    let tree = TreeIndex::for_store(&store);
    assert_eq!(tree.depth("orphan"), Some(0));
    let rows = build_visible(&ChildIndex::build(&store), &ExpansionState::new());
    assert_eq!(ids(&rows), ["page-1", "orphan"]);
}

#[test]
fn picker_session_walkthrough() {
    let mut picker = Picker::new(PickerConfig::default());
    picker.load("workspace-1", three_levels());

    picker.toggle_expand("root-1");
    picker.toggle_expand("child-1");
    assert_eq!(picker.rows().count(), 3);

    picker.toggle_select("child-1");
    assert_eq!(
        picker.selection().iter().collect::<Vec<_>>(),
        ["child-1", "grandchild-1"]
    );

    picker.set_query("Grand");
    assert_eq!(picker.rows().count(), 1);
    picker.toggle_select("grandchild-1");
    assert_eq!(picker.selection().iter().collect::<Vec<_>>(), ["child-1"]);

    picker.set_query("");
    assert_eq!(picker.rows().count(), 3);
    let parent = picker.row_view(0).unwrap();
    assert!(!parent.checked);
}
