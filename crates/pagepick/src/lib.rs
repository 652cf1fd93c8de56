#![forbid(unsafe_code)]

//! Hierarchical document selection for external page pickers.
//!
//! A flat, parent-linked list of remote records becomes a navigable tree:
//!
//! - [`tree_index`] derives depth, ancestors and descendants per record;
//! - [`children`] buckets records under their display parent;
//! - [`visible`] flattens the expanded part of the tree into rows;
//! - [`search`] produces flat matches with breadcrumbs;
//! - [`selection`] computes the next selection after a toggle;
//! - [`virtualized`] windows rows for a renderer;
//! - [`picker`] threads all of the above through one session.

pub mod children;
pub mod config;
pub mod error;
pub mod fenwick;
pub mod picker;
pub mod record;
pub mod row;
pub mod search;
pub mod selection;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod tree_index;
pub mod virtualized;
pub mod visible;

pub use children::ChildIndex;
pub use config::PickerConfig;
pub use error::SnapshotError;
pub use picker::{Picker, PreviewRequest, RowView};
pub use record::{
    LookupEntry, LookupMap, PageIcon, ROOT_PARENT, Record, RecordKind, RecordStore,
    StoreRevision, Workspace,
};
pub use row::{Row, ViewMode};
pub use search::MatchCase;
pub use selection::{ChoiceMode, Selection, SelectionMode};
pub use tree_index::{TreeIndex, TreeNode};
pub use virtualized::{RowSize, VariableHeights, VirtualRows, WindowRow};
pub use visible::{ExpansionState, build_visible};
