//! Interchange documents for commits.
//!
//! The change kind travels as a free-form string. Whether a string names a
//! known kind is the concrete change type's business, not the framework's.

use chrono::{DateTime, Utc};
use dictdiff_core_types::{CommitId, ModelElementRef};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One recorded change in interchange form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDocument {
    /// Identity token of the element the change targets
    pub target: ModelElementRef,
    /// Kind code (`"add"`, `"remove"`, `"modify"` for the dictionary domain)
    pub kind: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
}

/// One commit in interchange form. Change order is recording order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDocument {
    pub commit_id: CommitId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub changes: Vec<ChangeDocument>,
}

impl CommitDocument {
    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if serde_json fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a single commit document.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the input is not a valid document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a JSON array of commit documents.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` if the input is not a valid document array.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}
