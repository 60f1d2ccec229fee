//! Identity tokens for model elements and commits
//!
//! A token names a thing without holding it. Model elements may be
//! destroyed and recreated (for instance on reload) while their token
//! stays stable, so everything recorded about an element is keyed by
//! its token and resolved to a live object only at use time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, globally-unique identity of a dictionary model element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelElementRef(Uuid);

impl ModelElementRef {
    /// Generate a fresh token using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing 128-bit identifier
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying identifier
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ModelElementRef {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ModelElementRef {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for ModelElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a single commit (one comparison pass)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(Uuid);

impl CommitId {
    /// Generate a fresh CommitId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing identifier (for deserialization)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying identifier
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CommitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
