//! JSON workspace snapshots.
//!
//! The data source returns a list of workspaces, each carrying its pages:
//!
//! ```json
//! [{
//!   "workspace_id": "ws-1",
//!   "workspace_name": "Team",
//!   "workspace_icon": null,
//!   "pages": [
//!     {"page_id": "p1", "page_name": "Home", "parent_id": "root",
//!      "page_icon": {"type": "emoji", "emoji": "🏠"}, "type": "page",
//!      "is_bound": false}
//!   ]
//! }]
//! ```
//!
//! A bare page array is also accepted and treated as one anonymous
//! workspace.

use crate::error::{Result, SnapshotError};
use crate::record::{Record, RecordStore, Workspace};
use ahash::AHashSet;
use std::io::Read;

/// A parsed snapshot: the workspaces plus the store built from them.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub workspaces: Vec<Workspace>,
    pub store: RecordStore,
}

impl Snapshot {
    /// Id of the first workspace, used as the connection identity.
    #[must_use]
    pub fn connection_id(&self) -> &str {
        self.workspaces
            .first()
            .map_or("", |workspace| workspace.workspace_id.as_str())
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Payload {
    Workspaces(Vec<Workspace>),
    Pages(Vec<Record>),
}

/// Parse a snapshot from a JSON string.
pub fn from_json(json: &str) -> Result<Snapshot> {
    let payload: Payload = serde_json::from_str(json)?;
    finish(payload)
}

/// Parse a snapshot from a reader.
pub fn from_reader<R: Read>(reader: R) -> Result<Snapshot> {
    let payload: Payload = serde_json::from_reader(reader)?;
    finish(payload)
}

fn finish(payload: Payload) -> Result<Snapshot> {
    let workspaces = match payload {
        Payload::Workspaces(workspaces) => workspaces,
        Payload::Pages(pages) => vec![Workspace {
            pages,
            ..Workspace::default()
        }],
    };

    let mut seen = AHashSet::with_capacity(workspaces.len());
    for workspace in &workspaces {
        if !seen.insert(workspace.workspace_id.as_str()) {
            return Err(SnapshotError::DuplicateWorkspace {
                workspace_id: workspace.workspace_id.clone(),
            });
        }
    }

    let store = RecordStore::from_workspaces(&workspaces);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        message = "snapshot.load",
        workspaces = workspaces.len(),
        records = store.len(),
        bound = store.bound_ids().len(),
    );

    Ok(Snapshot { workspaces, store })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PageIcon, RecordKind, ROOT_PARENT};

    const PAYLOAD: &str = r#"[
        {
            "workspace_id": "workspace-1",
            "workspace_name": "Workspace 1",
            "workspace_icon": null,
            "pages": [
                {"page_id": "root-1", "page_name": "Root 1", "parent_id": "root",
                 "page_icon": {"type": "emoji", "emoji": "📁", "url": null},
                 "type": "page", "is_bound": true},
                {"page_id": "child-1", "page_name": "Child 1", "parent_id": "root-1",
                 "page_icon": {"type": "url", "url": "https://example.com/i.png", "emoji": null},
                 "type": "page", "is_bound": false},
                {"page_id": "db-1", "page_name": "Tasks", "page_icon": null,
                 "type": "database", "is_bound": false}
            ]
        }
    ]"#;

    #[test]
    fn parses_workspace_payload() {
        let snapshot = from_json(PAYLOAD).unwrap();
        assert_eq!(snapshot.connection_id(), "workspace-1");
        let store = &snapshot.store;
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get("root-1").and_then(|r| r.icon.clone()),
            Some(PageIcon::Emoji { emoji: "📁".to_owned() })
        );
        assert_eq!(
            store.get("child-1").and_then(|r| r.icon.clone()),
            Some(PageIcon::Url { url: "https://example.com/i.png".to_owned() })
        );
        let db = store.get("db-1").unwrap();
        assert_eq!(db.kind, RecordKind::Database);
        assert_eq!(db.parent_id, ROOT_PARENT);
        assert_eq!(store.bound_ids().into_iter().collect::<Vec<_>>(), ["root-1"]);
    }

    #[test]
    fn bare_page_list_is_accepted() {
        let snapshot = from_json(r#"[{"page_id": "a", "page_name": "A"}]"#).unwrap();
        assert_eq!(snapshot.store.len(), 1);
        assert_eq!(snapshot.connection_id(), "");
    }

    #[test]
    fn null_parent_is_top_level() {
        let json = r#"[{"workspace_id": "w", "pages": [
            {"page_id": "a", "page_name": "A", "parent_id": null},
            {"page_id": "b", "page_name": "B", "parent_id": "a"}
        ]}]"#;
        let snapshot = from_json(json).unwrap();
        let store = &snapshot.store;
        assert_eq!(store.len(), 2);
        let a = store.get("a").unwrap();
        assert_eq!(a.parent_id, ROOT_PARENT);
        assert!(!store.has_display_parent(a));
        assert!(store.has_display_parent(store.get("b").unwrap()));
    }

    #[test]
    fn empty_list_is_empty_store() {
        let snapshot = from_json("[]").unwrap();
        assert!(snapshot.store.is_empty());
    }

    #[test]
    fn reader_matches_str() {
        let snapshot = from_reader(PAYLOAD.as_bytes()).unwrap();
        assert_eq!(snapshot.store.len(), 3);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(from_json("{not json"), Err(SnapshotError::Json(_))));
        assert!(matches!(from_json(r#"{"pages": []}"#), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn duplicate_workspace_is_rejected() {
        let json = r#"[{"workspace_id": "w", "pages": []}, {"workspace_id": "w", "pages": []}]"#;
        assert!(matches!(
            from_json(json),
            Err(SnapshotError::DuplicateWorkspace { .. })
        ));
    }
}
