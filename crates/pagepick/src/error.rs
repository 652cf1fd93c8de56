use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Failure to load a workspace snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate workspace id: {workspace_id}")]
    DuplicateWorkspace { workspace_id: String },
}

#[cfg(test)]
mod tests {
    use super::SnapshotError;

    #[test]
    fn io_error_converts() {
        let error: SnapshotError = std::io::Error::other("disk gone").into();
        assert!(matches!(error, SnapshotError::Io(_)));
        assert_eq!(error.to_string(), "I/O error: disk gone");
    }

    #[test]
    fn duplicate_workspace_message() {
        let error = SnapshotError::DuplicateWorkspace {
            workspace_id: "ws-1".to_owned(),
        };
        assert_eq!(error.to_string(), "duplicate workspace id: ws-1");
    }
}
