use thiserror::Error;

/// Result type alias using VersioningError
pub type Result<T> = std::result::Result<T, VersioningError>;

/// Errors raised by the generic versioning driver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersioningError {
    /// Interchange bytes could not be parsed or produced
    #[error("Malformed commit document: {message}")]
    MalformedDocument { message: String },

    /// A change was appended to a commit that is already sealed
    #[error("Commit {commit_id} is sealed and cannot accept further changes")]
    CommitSealed { commit_id: String },
}

impl From<serde_json::Error> for VersioningError {
    fn from(err: serde_json::Error) -> Self {
        VersioningError::MalformedDocument {
            message: err.to_string(),
        }
    }
}
