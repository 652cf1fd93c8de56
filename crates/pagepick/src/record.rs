//! Remote document records and the store that owns them.
//!
//! A [`RecordStore`] is an immutable snapshot of one connection's page list:
//! the flat [`Record`] slice in source order plus a [`LookupMap`] keyed by id.
//! The lookup map is a superset of the list and may hold entries that only
//! exist to resolve ancestor names.
//!
//! # Example
//!
//! ```
//! use pagepick::record::{Record, RecordStore};
//!
//! let store = RecordStore::from_records(vec![
//!     Record::new("root-1", "Root 1"),
//!     Record::new("child-1", "Child 1").with_parent("root-1"),
//! ], "workspace-1");
//!
//! assert_eq!(store.len(), 2);
//! assert!(store.lookup().contains_key("child-1"));
//! ```

use ahash::AHashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Parent id that marks a top-level record.
pub const ROOT_PARENT: &str = "root";

/// Display icon attached to a record.
///
/// The engine never interprets icons; they are carried through to rows so the
/// renderer can pick a glyph or fetch an image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum PageIcon {
    /// A single emoji grapheme.
    Emoji { emoji: String },
    /// A remote image.
    Url { url: String },
}

/// Kind of remote document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum RecordKind {
    #[default]
    Page,
    Database,
}

/// A single external document reference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    #[cfg_attr(feature = "serde", serde(rename = "page_id"))]
    pub id: String,
    /// Missing or `null` reads as [`ROOT_PARENT`].
    #[cfg_attr(
        feature = "serde",
        serde(default = "root_parent", deserialize_with = "parent_or_root")
    )]
    pub parent_id: String,
    #[cfg_attr(feature = "serde", serde(rename = "page_name"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "page_icon", default))]
    pub icon: Option<PageIcon>,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub kind: RecordKind,
    /// Already committed upstream; stays selected and cannot be toggled.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_bound: bool,
}

#[cfg(feature = "serde")]
fn root_parent() -> String {
    ROOT_PARENT.to_owned()
}

#[cfg(feature = "serde")]
fn parent_or_root<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(root_parent))
}

impl Record {
    /// Create a top-level record.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: ROOT_PARENT.to_owned(),
            name: name.into(),
            icon: None,
            kind: RecordKind::Page,
            is_bound: false,
        }
    }

    /// Set the parent id.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = parent_id.into();
        self
    }

    /// Set the display icon.
    #[must_use]
    pub fn with_icon(mut self, icon: PageIcon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the record kind.
    #[must_use]
    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the record as bound (locked).
    #[must_use]
    pub fn bound(mut self, is_bound: bool) -> Self {
        self.is_bound = is_bound;
        self
    }

    /// Whether the parent id is the top-level sentinel.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent_id == ROOT_PARENT
    }
}

/// Lookup map value: a record plus the connection it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub record: Record,
    pub connection_id: String,
}

/// `id -> record` map accompanying the flat list.
pub type LookupMap = AHashMap<String, LookupEntry>;

/// Process-unique identity of a [`RecordStore`] snapshot.
///
/// Indexes remember the revision they were built from and are rebuilt only
/// when a store with a different revision arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreRevision(u64);

impl StoreRevision {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw revision number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One workspace as returned by the external data source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Workspace {
    pub workspace_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub workspace_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub workspace_icon: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pages: Vec<Record>,
}

/// Immutable flat record list plus lookup map.
///
/// Cloning is cheap: both halves are reference counted, and a clone keeps the
/// same [`StoreRevision`].
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[Record]>,
    lookup: Arc<LookupMap>,
    revision: StoreRevision,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::from_parts(Vec::new(), LookupMap::default())
    }
}

impl RecordStore {
    /// Build a store from an explicit list and lookup map.
    #[must_use]
    pub fn from_parts(records: Vec<Record>, lookup: LookupMap) -> Self {
        Self {
            records: records.into(),
            lookup: Arc::new(lookup),
            revision: StoreRevision::next(),
        }
    }

    /// Build a store whose lookup map mirrors the list exactly.
    #[must_use]
    pub fn from_records(records: Vec<Record>, connection_id: &str) -> Self {
        let mut lookup = LookupMap::with_capacity(records.len());
        for record in &records {
            lookup.insert(
                record.id.clone(),
                LookupEntry {
                    record: record.clone(),
                    connection_id: connection_id.to_owned(),
                },
            );
        }
        Self::from_parts(records, lookup)
    }

    /// Flatten the pages of every workspace, in order.
    ///
    /// Map entries take the workspace id as their connection id; when two
    /// workspaces report the same page id the later one wins in the map while
    /// both stay in the list.
    #[must_use]
    pub fn from_workspaces(workspaces: &[Workspace]) -> Self {
        let total = workspaces.iter().map(|ws| ws.pages.len()).sum();
        let mut records = Vec::with_capacity(total);
        let mut lookup = LookupMap::with_capacity(total);
        for workspace in workspaces {
            for page in &workspace.pages {
                lookup.insert(
                    page.id.clone(),
                    LookupEntry {
                        record: page.clone(),
                        connection_id: workspace.workspace_id.clone(),
                    },
                );
                records.push(page.clone());
            }
        }
        Self::from_parts(records, lookup)
    }

    /// Records in source order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Shared handle to the record list.
    #[must_use]
    pub fn records_arc(&self) -> Arc<[Record]> {
        Arc::clone(&self.records)
    }

    #[must_use]
    pub fn lookup(&self) -> &LookupMap {
        &self.lookup
    }

    /// Look up a record by id in the map.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.lookup.get(id).map(|entry| &entry.record)
    }

    #[must_use]
    pub fn revision(&self) -> StoreRevision {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of records marked bound in the list.
    #[must_use]
    pub fn bound_ids(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|record| record.is_bound)
            .map(|record| record.id.clone())
            .collect()
    }

    /// Whether a parent id resolves to a display parent.
    ///
    /// `false` for the sentinel, for empty ids, and for ids the lookup map
    /// does not know (orphans hang at the top level).
    #[must_use]
    pub fn has_display_parent(&self, record: &Record) -> bool {
        record.parent_id != ROOT_PARENT
            && !record.parent_id.is_empty()
            && self.lookup.contains_key(&record.parent_id)
    }
}
