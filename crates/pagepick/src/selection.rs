//! Selection semantics.
//!
//! [`toggle`] is a pure function: it reads the current selection and returns
//! the next one, never touching its input.
//!
//! | Choice   | View   | Effect of toggling `id`                                |
//! |----------|--------|--------------------------------------------------------|
//! | multiple | tree   | `id` and every descendant flip together               |
//! | multiple | search | only `id` flips                                        |
//! | single   | any    | `id` replaces the selection, or empties it if selected |
//!
//! Disabled ids keep their membership through every toggle. A folder whose
//! children were toggled individually is left as is; no parent state is
//! reconciled.

use crate::row::ViewMode;
use crate::tree_index::TreeIndex;
use std::collections::BTreeSet;
use std::collections::btree_set;

/// How many ids may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ChoiceMode {
    Single,
    #[default]
    Multiple,
}

/// Choice mode combined with the current view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionMode {
    pub choice: ChoiceMode,
    pub view: ViewMode,
}

impl SelectionMode {
    #[must_use]
    pub const fn new(choice: ChoiceMode, view: ViewMode) -> Self {
        Self { choice, view }
    }

    /// Whether toggles propagate to descendants.
    #[must_use]
    pub const fn cascades(self) -> bool {
        matches!(
            (self.choice, self.view),
            (ChoiceMode::Multiple, ViewMode::Tree)
        )
    }
}

/// An ordered set of selected ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Selection(BTreeSet<String>);

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    #[must_use]
    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }
}

impl From<BTreeSet<String>> for Selection {
    fn from(set: BTreeSet<String>) -> Self {
        Self(set)
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Selection {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Next selection after the user toggles `id`.
#[must_use]
pub fn toggle(
    id: &str,
    current: &Selection,
    mode: SelectionMode,
    tree: &TreeIndex,
    disabled: &Selection,
) -> Selection {
    if disabled.contains(id) {
        return current.clone();
    }

    let mut next = current.clone();
    let was_selected = current.contains(id);

    match mode.choice {
        ChoiceMode::Single => {
            // Locked ids survive the reset.
            next.0.retain(|selected| disabled.contains(selected));
            if !was_selected {
                next.insert(id);
            }
        }
        ChoiceMode::Multiple => {
            if was_selected {
                next.remove(id);
            } else {
                next.insert(id);
            }
            if mode.cascades() {
                for descendant in tree.descendants(id) {
                    if disabled.contains(descendant) {
                        continue;
                    }
                    if was_selected {
                        next.remove(descendant);
                    } else {
                        next.insert(descendant);
                    }
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        message = "selection.toggle",
        id,
        was_selected,
        cascades = mode.cascades(),
        before = current.len(),
        after = next.len(),
    );

    next
}
