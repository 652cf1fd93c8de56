use pagepick::SnapshotError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: SnapshotError,
    },

    #[error("unknown page id: {id}")]
    UnknownId { id: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::UnknownId { .. } => 2,
            Self::Snapshot { .. } => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliError;
    use pagepick::SnapshotError;

    #[test]
    fn invalid_constructor_formats_message() {
        let error = CliError::invalid("viewport must be positive");
        assert_eq!(error.exit_code(), 2);
        assert_eq!(error.to_string(), "invalid argument: viewport must be positive");
    }

    #[test]
    fn snapshot_errors_exit_with_three() {
        let error = CliError::Snapshot {
            path: "pages.json".to_owned(),
            source: SnapshotError::from(std::io::Error::other("gone")),
        };
        assert_eq!(error.exit_code(), 3);
        assert_eq!(error.to_string(), "snapshot pages.json: I/O error: gone");
    }

    #[test]
    fn io_errors_map_to_generic_exit() {
        let error = CliError::from(std::io::Error::other("broken pipe"));
        assert_eq!(error.exit_code(), 1);
    }
}
