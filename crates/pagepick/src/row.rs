//! Rows handed to the renderer.

use crate::record::{PageIcon, Record, RecordKind};

/// Which row builder feeds the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ViewMode {
    /// Hierarchical rows with expand/collapse.
    #[default]
    Tree,
    /// Flat substring matches with breadcrumbs.
    Search,
}

impl ViewMode {
    /// Search mode for any non-empty query, tree mode otherwise.
    #[must_use]
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            Self::Tree
        } else {
            Self::Search
        }
    }

    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search)
    }
}

/// One renderable line of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    pub id: String,
    pub name: String,
    pub icon: Option<PageIcon>,
    pub kind: RecordKind,
    /// Indentation level; always 0 in search mode.
    pub depth: usize,
    /// Whether the node's children are currently shown.
    pub expand: bool,
    /// Whether an expand affordance applies.
    pub has_children: bool,
    /// Ancestor path, present only in search mode.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub breadcrumb: Option<String>,
}

impl Row {
    pub(crate) fn tree(record: &Record, depth: usize, expand: bool, has_children: bool) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            icon: record.icon.clone(),
            kind: record.kind,
            depth,
            expand,
            has_children,
            breadcrumb: None,
        }
    }

    pub(crate) fn search(record: &Record, breadcrumb: String) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            icon: record.icon.clone(),
            kind: record.kind,
            depth: 0,
            expand: false,
            has_children: false,
            breadcrumb: Some(breadcrumb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_mode_for_query() {
        assert_eq!(ViewMode::for_query(""), ViewMode::Tree);
        assert_eq!(ViewMode::for_query("a"), ViewMode::Search);
        // Whitespace is a literal query.
        assert!(ViewMode::for_query(" ").is_search());
    }
}
