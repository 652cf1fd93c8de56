//! Adjacency index from parent id to ordered children.
//!
//! Expanding a node reads one bucket instead of filtering the whole list.
//! Buckets hold positions into the store's record slice, in source order.

use crate::record::{Record, RecordStore, StoreRevision};
use ahash::AHashMap;
use std::sync::Arc;

/// `parent id -> children` index with a dedicated bucket for display roots.
#[derive(Debug, Clone)]
pub struct ChildIndex {
    records: Arc<[Record]>,
    roots: Vec<usize>,
    by_parent: AHashMap<String, Vec<usize>>,
    revision: StoreRevision,
}

impl ChildIndex {
    /// Bucket every record of `store` under its display parent.
    ///
    /// A record lands in the root bucket when its parent id is `"root"`,
    /// empty, or absent from the lookup map.
    #[must_use]
    pub fn build(store: &RecordStore) -> Self {
        let records = store.records_arc();
        let mut roots = Vec::new();
        let mut by_parent: AHashMap<String, Vec<usize>> = AHashMap::new();

        for (position, record) in records.iter().enumerate() {
            if store.has_display_parent(record) {
                by_parent
                    .entry(record.parent_id.clone())
                    .or_default()
                    .push(position);
            } else {
                roots.push(position);
            }
        }

        Self {
            records,
            roots,
            by_parent,
            revision: store.revision(),
        }
    }

    /// Whether this index was built from `store`.
    #[must_use]
    pub fn is_current_for(&self, store: &RecordStore) -> bool {
        self.revision == store.revision()
    }

    /// Positions of the children of `parent`, or of the display roots for `None`.
    #[must_use]
    pub fn bucket(&self, parent: Option<&str>) -> &[usize] {
        match parent {
            None => &self.roots,
            Some(id) => self.by_parent.get(id).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Children of `parent` in source order.
    pub fn children(&self, parent: Option<&str>) -> impl Iterator<Item = &Record> + '_ {
        self.bucket(parent)
            .iter()
            .map(move |&position| &self.records[position])
    }

    /// Whether `id` has at least one listed child.
    #[must_use]
    pub fn has_children(&self, id: &str) -> bool {
        !self.bucket(Some(id)).is_empty()
    }

    /// Record at a list position.
    #[must_use]
    pub fn record(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    #[must_use]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Total records indexed (every record is in exactly one bucket).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
