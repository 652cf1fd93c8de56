//! Tree-mode rows and the expansion state that drives them.
//!
//! [`build_visible`] walks the [`ChildIndex`] depth-first from the display
//! roots and descends only into expanded ids, so the amount of work tracks the
//! number of visible rows rather than the size of the store.
//!
//! Collapsing a node also forgets every expanded descendant. Re-expanding it
//! later shows one level only.

use crate::children::ChildIndex;
use crate::row::Row;
use crate::tree_index::TreeIndex;
use ahash::AHashSet;
#[cfg(feature = "tracing")]
use web_time::Instant;

/// Ids whose children are currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: AHashSet<String>,
}

impl ExpansionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.expanded.iter().map(String::as_str)
    }

    /// Next state after toggling `id`.
    ///
    /// Expanding inserts `id`. Collapsing removes `id` and all of its
    /// descendants.
    #[must_use]
    pub fn toggled(&self, id: &str, tree: &TreeIndex) -> Self {
        let mut next = self.clone();
        if next.expanded.remove(id) {
            for descendant in tree.descendants(id) {
                next.expanded.remove(descendant);
            }
        } else {
            next.expanded.insert(id.to_owned());
        }
        next
    }
}

impl<S: Into<String>> FromIterator<S> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Flatten the expanded part of the tree into display order.
///
/// Every display root is emitted at depth 0. An expanded row is followed by
/// its children before the next sibling. Each list position is emitted at
/// most once, so repeated ids and parent cycles cannot loop here.
#[must_use]
pub fn build_visible(index: &ChildIndex, expanded: &ExpansionState) -> Vec<Row> {
    #[cfg(feature = "tracing")]
    let build_start = Instant::now();
    #[cfg(feature = "tracing")]
    let build_span = tracing::debug_span!(
        "visible_rows.build",
        roots = index.root_count(),
        expanded = expanded.len(),
        rows = tracing::field::Empty,
        build_duration_us = tracing::field::Empty,
    );
    #[cfg(feature = "tracing")]
    let _build_guard = build_span.enter();

    let mut rows = Vec::with_capacity(index.root_count());
    // (position, depth), siblings pushed in reverse so they pop in order.
    let mut stack: Vec<(usize, usize)> = index
        .bucket(None)
        .iter()
        .rev()
        .map(|&position| (position, 0))
        .collect();

    let mut visited = vec![false; index.len()];

    while let Some((position, depth)) = stack.pop() {
        let Some(record) = index.record(position) else {
            continue;
        };
        // A record whose parent id repeats its own id sits in its own bucket.
        if std::mem::replace(&mut visited[position], true) {
            continue;
        }
        let children = index.bucket(Some(record.id.as_str()));
        let expand = expanded.is_expanded(&record.id);
        rows.push(Row::tree(record, depth, expand, !children.is_empty()));
        if expand {
            stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
        }
    }

    #[cfg(feature = "tracing")]
    {
        build_span.record("rows", rows.len());
        build_span.record(
            "build_duration_us",
            build_start.elapsed().as_micros() as u64,
        );
    }

    rows
}
