//! Picker session: the host-side state holder.
//!
//! The engine functions are pure; [`Picker`] owns their inputs and outputs
//! across interactions and applies the lifecycle rules:
//!
//! - a store with a new revision rebuilds both indexes;
//! - a new connection id discards expansion, query and preview, and seeds
//!   selection and the disabled set with the store's bound ids;
//! - expansion survives a round trip through search mode.

use crate::children::ChildIndex;
use crate::config::PickerConfig;
use crate::record::RecordStore;
use crate::row::{Row, ViewMode};
use crate::search::search;
use crate::selection::{Selection, SelectionMode, toggle};
use crate::tree_index::TreeIndex;
use crate::virtualized::{RowSize, VirtualRows};
use crate::visible::{ExpansionState, build_visible};

/// Request to show a record in the preview pane.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewRequest {
    pub id: String,
    pub name: String,
    /// Connection the record was resolved from.
    pub connection_id: String,
}

/// A row decorated with per-row interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowView<'a> {
    pub row: &'a Row,
    pub checked: bool,
    pub disabled: bool,
    /// The row is the current preview target.
    pub previewing: bool,
    /// An expand arrow is drawn: the row has children and the view is a tree.
    pub show_arrow: bool,
}

/// Owns everything one picker needs between interactions.
#[derive(Debug, Clone)]
pub struct Picker {
    config: PickerConfig,
    connection_id: Option<String>,
    store: RecordStore,
    tree: TreeIndex,
    children: ChildIndex,
    expansion: ExpansionState,
    selection: Selection,
    disabled: Selection,
    query: String,
    previewing: Option<String>,
    rows: VirtualRows,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(PickerConfig::default())
    }
}

impl Picker {
    /// Empty picker; call [`load`](Self::load) to attach a store.
    #[must_use]
    pub fn new(config: PickerConfig) -> Self {
        let config = config.validated();
        let store = RecordStore::default();
        Self {
            config,
            connection_id: None,
            tree: TreeIndex::for_store(&store),
            children: ChildIndex::build(&store),
            store,
            expansion: ExpansionState::new(),
            selection: Selection::new(),
            disabled: Selection::new(),
            query: String::new(),
            previewing: None,
            rows: VirtualRows::new(RowSize::Fixed(config.row_height))
                .with_overscan(config.overscan),
        }
    }

    /// Attach `store` for `connection_id`.
    ///
    /// Reloading the same store for the same connection is a no-op apart from
    /// recomputing rows. A new store for the same connection keeps expansion,
    /// query and selection, but re-locks its bound pages and adds them to the
    /// selection.
    pub fn load(&mut self, connection_id: &str, store: RecordStore) {
        let connection_changed = self.connection_id.as_deref() != Some(connection_id);
        let store_changed = !self.tree.is_current_for(&store);

        self.store = store;
        if store_changed {
            self.tree = TreeIndex::for_store(&self.store);
            self.children = ChildIndex::build(&self.store);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "picker.rebuild",
                connection_id,
                records = self.store.len(),
                revision = self.store.revision().get(),
            );
        }

        if connection_changed {
            let bound: Selection = self.store.bound_ids().into();
            self.connection_id = Some(connection_id.to_owned());
            self.expansion = ExpansionState::new();
            self.query.clear();
            self.previewing = None;
            self.selection = bound.clone();
            self.disabled = bound;
            self.rows.scroll_to(0, 0);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "picker.reset",
                connection_id,
                bound = self.disabled.len(),
            );
        } else if store_changed {
            self.disabled = self.store.bound_ids().into();
            for id in self.disabled.iter() {
                self.selection.insert(id);
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "picker.rebind",
                connection_id,
                bound = self.disabled.len(),
            );
        }

        self.refresh();
    }

    /// Replace the search query. An empty query returns to tree mode.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.refresh();
    }

    /// Expand or collapse `id`. Ignored in search mode.
    ///
    /// Returns whether the expansion state changed.
    pub fn toggle_expand(&mut self, id: &str) -> bool {
        if self.view_mode().is_search() {
            return false;
        }
        self.expansion = self.expansion.toggled(id, &self.tree);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "picker.toggle_expand",
            id,
            expanded = self.expansion.is_expanded(id),
        );
        self.refresh();
        true
    }

    /// Replace the expansion state wholesale. Ignored in search mode.
    pub fn set_expansion(&mut self, expansion: ExpansionState) {
        if self.view_mode().is_search() {
            return;
        }
        self.expansion = expansion;
        self.refresh();
    }

    /// Expand every node that has children.
    pub fn expand_all(&mut self) {
        let all: ExpansionState = self
            .tree
            .iter()
            .filter(|node| node.has_children())
            .map(|node| node.id().to_owned())
            .collect();
        self.set_expansion(all);
    }

    /// Toggle the selection of `id` under the current modes.
    ///
    /// Returns whether the selection changed.
    pub fn toggle_select(&mut self, id: &str) -> bool {
        let mode = SelectionMode::new(self.config.choice, self.view_mode());
        let next = toggle(id, &self.selection, mode, &self.tree, &self.disabled);
        if next == self.selection {
            return false;
        }
        self.selection = next;
        true
    }

    /// Overwrite the selection, e.g. from a host that owns it.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Overwrite the set of locked ids.
    pub fn set_disabled(&mut self, disabled: Selection) {
        self.disabled = disabled;
    }

    /// Ask to preview `id`.
    ///
    /// `None` when preview is turned off or the id is unknown to the store.
    pub fn preview(&mut self, id: &str) -> Option<PreviewRequest> {
        if !self.config.can_preview {
            return None;
        }
        let entry = self.store.lookup().get(id)?;
        self.previewing = Some(id.to_owned());
        Some(PreviewRequest {
            id: id.to_owned(),
            name: entry.record.name.clone(),
            connection_id: entry.connection_id.clone(),
        })
    }

    /// Row `index` of the current view with its interaction state.
    #[must_use]
    pub fn row_view(&self, index: usize) -> Option<RowView<'_>> {
        let row = self.rows.get(index)?;
        Some(self.decorate(row))
    }

    /// Decorated rows for `viewport`, including overscan.
    pub fn window(&self, viewport: u32) -> impl Iterator<Item = (u32, RowView<'_>)> + '_ {
        self.rows
            .window(viewport)
            .map(move |slot| (slot.offset, self.decorate(slot.row)))
    }

    fn decorate<'a>(&self, row: &'a Row) -> RowView<'a> {
        RowView {
            row,
            checked: self.selection.contains(&row.id),
            disabled: self.disabled.contains(&row.id),
            previewing: self.previewing.as_deref() == Some(row.id.as_str()),
            show_arrow: row.has_children && !self.view_mode().is_search(),
        }
    }

    fn refresh(&mut self) {
        let rows = match self.view_mode() {
            ViewMode::Tree => build_visible(&self.children, &self.expansion),
            ViewMode::Search => search(
                self.store.records(),
                &self.tree,
                &self.query,
                self.config.match_case,
            ),
        };
        self.rows.set_rows(rows);
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        ViewMode::for_query(&self.query)
    }

    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    #[must_use]
    pub fn connection_id(&self) -> Option<&str> {
        self.connection_id.as_deref()
    }

    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows of the current view plus scroll state.
    #[must_use]
    pub fn rows(&self) -> &VirtualRows {
        &self.rows
    }

    /// Mutable access for scrolling and row measurement.
    pub fn rows_mut(&mut self) -> &mut VirtualRows {
        &mut self.rows
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn disabled(&self) -> &Selection {
        &self.disabled
    }

    #[must_use]
    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    #[must_use]
    pub fn previewing(&self) -> Option<&str> {
        self.previewing.as_deref()
    }
}
