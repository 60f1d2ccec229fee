use dictdiff_core_types::ModelElementRef;
use dictdiff_versioning::VersioningError;
use thiserror::Error;

/// Result type alias using DictDiffError
pub type Result<T> = std::result::Result<T, DictDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for
/// programmatic error handling, testing, and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Data integrity
    UnrecognizedChangeKind,

    // Mutation
    CommitSealed,

    // Integration/IO
    Serialization,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnrecognizedChangeKind => "ERR_UNRECOGNIZED_CHANGE_KIND",
            ExErrorKind::CommitSealed => "ERR_COMMIT_SEALED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification for programmatic handling plus context for
/// debugging (operation, entity, position within a commit).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    position: Option<usize>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            position: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add record position context
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the record position, if any
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(position) = self.position {
            write!(f, " (position: {})", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for change tracking and replay
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DictDiffError {
    /// A stored change kind is outside the closed enumeration
    ///
    /// `position` is the record's index within its commit when known.
    #[error("Unrecognized change kind '{code}' for element {target}")]
    UnrecognizedChangeKind {
        code: String,
        target: ModelElementRef,
        position: Option<usize>,
    },

    /// A change was appended to a sealed commit
    #[error("Commit {commit_id} is sealed and cannot accept further changes")]
    CommitSealed { commit_id: String },

    /// Interchange (de)serialization failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A shared structure's lock was poisoned by a panicking holder
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: String },
}

impl DictDiffError {
    /// Attach a record position to a kind error; other errors pass through
    pub(crate) fn at_position(self, position: usize) -> Self {
        match self {
            DictDiffError::UnrecognizedChangeKind { code, target, .. } => {
                DictDiffError::UnrecognizedChangeKind {
                    code,
                    target,
                    position: Some(position),
                }
            }
            other => other,
        }
    }
}

/// Conversion from DictDiffError to the canonical ExError
impl From<DictDiffError> for ExError {
    fn from(err: DictDiffError) -> Self {
        match err {
            DictDiffError::UnrecognizedChangeKind {
                code,
                target,
                position,
            } => {
                let ex = ExError::new(ExErrorKind::UnrecognizedChangeKind)
                    .with_entity_id(target.to_string())
                    .with_message(format!("Unrecognized change kind '{}'", code));
                match position {
                    Some(position) => ex.with_position(position),
                    None => ex,
                }
            }

            DictDiffError::CommitSealed { commit_id } => ExError::new(ExErrorKind::CommitSealed)
                .with_entity_id(commit_id)
                .with_message("Commit is sealed"),

            DictDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            DictDiffError::LockPoisoned { resource } => ExError::new(ExErrorKind::Concurrency)
                .with_message(format!("Lock poisoned: {}", resource)),
        }
    }
}

/// Conversion from serde_json::Error to DictDiffError
impl From<serde_json::Error> for DictDiffError {
    fn from(err: serde_json::Error) -> Self {
        DictDiffError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from the versioning framework's errors
impl From<VersioningError> for DictDiffError {
    fn from(err: VersioningError) -> Self {
        match err {
            VersioningError::MalformedDocument { message } => {
                DictDiffError::Serialization { message }
            }
            VersioningError::CommitSealed { commit_id } => {
                DictDiffError::CommitSealed { commit_id }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (
                ExErrorKind::UnrecognizedChangeKind,
                "ERR_UNRECOGNIZED_CHANGE_KIND",
            ),
            (ExErrorKind::CommitSealed, "ERR_COMMIT_SEALED"),
            (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
            (ExErrorKind::Concurrency, "ERR_CONCURRENCY"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_code_and_position() {
        let err = ExError::new(ExErrorKind::UnrecognizedChangeKind)
            .with_op("replay")
            .with_position(3)
            .with_message("bad kind");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_UNRECOGNIZED_CHANGE_KIND]"));
        assert!(text.contains("'replay'"));
        assert!(text.contains("(position: 3)"));
    }

    #[test]
    fn test_at_position_only_touches_kind_errors() {
        let target = ModelElementRef::new();
        let err = DictDiffError::UnrecognizedChangeKind {
            code: "rename".to_string(),
            target,
            position: None,
        }
        .at_position(2);
        let ex: ExError = err.into();
        assert_eq!(ex.position(), Some(2));
        assert_eq!(ex.entity_id(), Some(target.to_string().as_str()));

        let sealed = DictDiffError::CommitSealed {
            commit_id: "c1".to_string(),
        };
        assert_eq!(sealed.clone().at_position(2), sealed);
    }

    #[test]
    fn test_versioning_sealed_maps_to_commit_sealed() {
        let err: DictDiffError = VersioningError::CommitSealed {
            commit_id: "c1".to_string(),
        }
        .into();
        assert_eq!(
            err,
            DictDiffError::CommitSealed {
                commit_id: "c1".to_string()
            }
        );
    }
}
