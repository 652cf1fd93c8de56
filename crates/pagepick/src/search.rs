//! Flat substring search with breadcrumbs.
//!
//! Search mode ignores the hierarchy: every record whose name contains the
//! query becomes one row, in source order, labelled with its ancestor path.
//! Matching is case-sensitive unless [`MatchCase::Insensitive`] is requested.

use crate::record::Record;
use crate::row::Row;
use crate::tree_index::{TreeIndex, breadcrumb};

/// Case handling for name matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum MatchCase {
    #[default]
    Sensitive,
    Insensitive,
}

/// Every record whose name contains `query`, annotated with its breadcrumb.
///
/// Records unknown to `tree` fall back to their bare name as breadcrumb.
#[must_use]
pub fn search(records: &[Record], tree: &TreeIndex, query: &str, match_case: MatchCase) -> Vec<Row> {
    #[cfg(feature = "tracing")]
    let search_span = tracing::debug_span!(
        "search.flatten",
        records = records.len(),
        query_len = query.len(),
        matches = tracing::field::Empty,
    );
    #[cfg(feature = "tracing")]
    let _search_guard = search_span.enter();

    let folded_query = match match_case {
        MatchCase::Sensitive => None,
        MatchCase::Insensitive => Some(query.to_lowercase()),
    };

    let rows: Vec<Row> = records
        .iter()
        .filter(|record| match &folded_query {
            None => record.name.contains(query),
            Some(folded) => record.name.to_lowercase().contains(folded.as_str()),
        })
        .map(|record| {
            let crumb = match tree.get(&record.id) {
                Some(node) => breadcrumb(node.ancestors(), &record.name),
                None => record.name.clone(),
            };
            Row::search(record, crumb)
        })
        .collect();

    #[cfg(feature = "tracing")]
    search_span.record("matches", rows.len());

    rows
}
