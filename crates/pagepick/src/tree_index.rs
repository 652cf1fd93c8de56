//! Per-record hierarchy metadata derived from parent pointers.
//!
//! [`TreeIndex::build`] walks each record's parent chain once and records, for
//! every node it touches, the direct children, the transitive descendants
//! (excluding the node itself), the depth and the ancestor names from the top
//! down.
//!
//! # Invariants
//!
//! 1. `r.id ∈ parent(r).children` for every record with a display parent.
//! 2. `r.id ∈ a.descendants` for every ancestor `a` reachable through the map.
//! 3. `depth(r) == ancestors(r).len()`.
//! 4. Records whose parent is `"root"`, empty, or unknown to the lookup map
//!    have depth 0.
//!
//! Parent chains are untrusted. A walk that would revisit an id stops there,
//! so cyclic input terminates with truncated depths instead of looping.

use crate::record::{LookupMap, ROOT_PARENT, Record, RecordStore, StoreRevision};
use ahash::{AHashMap, AHashSet};
#[cfg(feature = "tracing")]
use web_time::Instant;

/// Derived hierarchy data for one id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    id: String,
    name: String,
    parent_id: String,
    children: AHashSet<String>,
    descendants: AHashSet<String>,
    depth: usize,
    ancestors: Vec<String>,
}

impl TreeNode {
    fn seed(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            parent_id: record.parent_id.clone(),
            children: AHashSet::new(),
            descendants: AHashSet::new(),
            depth: 0,
            ancestors: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &AHashSet<String> {
        &self.children
    }

    /// Transitive descendants, not including this node.
    #[must_use]
    pub fn descendants(&self) -> &AHashSet<String> {
        &self.descendants
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Ancestor names, topmost first, immediate parent last.
    #[must_use]
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// `"A / B / name"`, or just the name at the top level.
    #[must_use]
    pub fn breadcrumb(&self) -> String {
        breadcrumb(&self.ancestors, &self.name)
    }
}

pub(crate) fn breadcrumb(ancestors: &[String], name: &str) -> String {
    if ancestors.is_empty() {
        return name.to_owned();
    }
    let mut out = ancestors.join(" / ");
    out.push_str(" / ");
    out.push_str(name);
    out
}

/// Hierarchy metadata for every record in a store.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    nodes: AHashMap<String, TreeNode>,
    revision: Option<StoreRevision>,
}

impl TreeIndex {
    /// Build the index for a store, remembering its revision.
    #[must_use]
    pub fn for_store(store: &RecordStore) -> Self {
        let mut index = Self::build(store.records(), store.lookup());
        index.revision = Some(store.revision());
        index
    }

    /// Build the index from a flat list and its lookup map.
    #[must_use]
    pub fn build(records: &[Record], lookup: &LookupMap) -> Self {
        #[cfg(feature = "tracing")]
        let build_start = Instant::now();
        #[cfg(feature = "tracing")]
        let build_span = tracing::debug_span!(
            "tree_index.build",
            records = records.len(),
            nodes = tracing::field::Empty,
            build_duration_us = tracing::field::Empty,
        );
        #[cfg(feature = "tracing")]
        let _build_guard = build_span.enter();

        let mut nodes: AHashMap<String, TreeNode> = AHashMap::with_capacity(records.len());
        let mut walked: AHashSet<&str> = AHashSet::with_capacity(records.len());

        for record in records {
            nodes
                .entry(record.id.clone())
                .or_insert_with(|| TreeNode::seed(record));
            // Duplicate ids would double-count depth on a second walk.
            if walked.insert(record.id.as_str()) {
                push_into_ancestors(lookup, &mut nodes, record);
            }
        }

        #[cfg(feature = "tracing")]
        {
            build_span.record("nodes", nodes.len());
            build_span.record(
                "build_duration_us",
                build_start.elapsed().as_micros() as u64,
            );
        }

        Self {
            nodes,
            revision: None,
        }
    }

    /// Revision of the store this index was built from, if any.
    #[must_use]
    pub fn revision(&self) -> Option<StoreRevision> {
        self.revision
    }

    /// Whether this index was built from `store`.
    #[must_use]
    pub fn is_current_for(&self, store: &RecordStore) -> bool {
        self.revision == Some(store.revision())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of indexed ids, including map-only ancestors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn depth(&self, id: &str) -> Option<usize> {
        self.nodes.get(id).map(TreeNode::depth)
    }

    /// Descendants of `id`; empty for unknown ids.
    pub fn descendants(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|node| node.descendants.iter().map(String::as_str))
    }

    #[must_use]
    pub fn has_children(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(TreeNode::has_children)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.values()
    }
}

/// Register `leaf` with every ancestor reachable through `lookup`.
fn push_into_ancestors(lookup: &LookupMap, nodes: &mut AHashMap<String, TreeNode>, leaf: &Record) {
    if leaf.parent_id.is_empty() {
        return;
    }

    let mut seen: AHashSet<&str> = AHashSet::new();
    seen.insert(leaf.id.as_str());

    let mut ancestors: Vec<String> = Vec::new();
    let mut current_id: &str = leaf.id.as_str();
    let mut parent_id: &str = leaf.parent_id.as_str();

    while parent_id != ROOT_PARENT && !parent_id.is_empty() {
        let Some(parent_entry) = lookup.get(parent_id) else {
            break;
        };
        if !seen.insert(parent_id) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                message = "tree_index.cycle",
                leaf = leaf.id.as_str(),
                revisited = parent_id,
            );
            break;
        }

        let parent = nodes
            .entry(parent_id.to_owned())
            .or_insert_with(|| TreeNode::seed(&parent_entry.record));
        parent.children.insert(current_id.to_owned());
        parent.descendants.insert(current_id.to_owned());
        parent.descendants.insert(leaf.id.clone());

        ancestors.push(parent_entry.record.name.clone());
        current_id = parent_id;
        parent_id = parent_entry.record.parent_id.as_str();
    }

    if ancestors.is_empty() {
        return;
    }
    ancestors.reverse();
    if let Some(node) = nodes.get_mut(&leaf.id) {
        node.depth = ancestors.len();
        node.ancestors = ancestors;
    }
}
