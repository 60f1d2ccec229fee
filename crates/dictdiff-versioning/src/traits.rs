//! Abstract interfaces the framework drives.
//!
//! A domain crate implements these for its concrete types and hands the
//! framework an [`ObjectFactory`]. The framework never constructs a change,
//! commit or history any other way.

use chrono::{DateTime, Utc};
use dictdiff_core_types::{CommitId, ModelElementRef};

use crate::document::ChangeDocument;
use crate::errors::Result;

/// A single recorded change, as seen by the framework
pub trait GenericChange {
    /// Identity token of the targeted element
    fn target(&self) -> ModelElementRef;

    /// Fill a freshly created change from its interchange form.
    ///
    /// Must not fail: an unknown kind code is stored as-is and surfaced
    /// later by the domain when the change is interpreted.
    fn populate(&mut self, doc: &ChangeDocument);

    /// Produce the interchange form of this change
    fn to_document(&self) -> ChangeDocument;
}

/// An ordered batch of changes, as seen by the framework
pub trait GenericCommit {
    type Change: GenericChange;

    /// Commit identity
    fn commit_id(&self) -> CommitId;

    /// Commit creation time
    fn created_at(&self) -> DateTime<Utc>;

    /// Restore identity and creation time from an interchange document
    fn restore_identity(&mut self, commit_id: CommitId, created_at: DateTime<Utc>);

    /// Append a change in recording order.
    ///
    /// # Errors
    ///
    /// Returns `CommitSealed` once the commit has been sealed.
    fn append_change(&mut self, change: Self::Change) -> Result<()>;

    /// Freeze the commit; later appends fail
    fn seal(&mut self);

    /// Changes in recording order
    fn changes(&self) -> &[Self::Change];
}

/// A per-element index of recorded changes, as seen by the framework
pub trait GenericHistory {
    type Commit: GenericCommit;

    /// Index every change of `commit` in recording order.
    ///
    /// Recording a commit that is already indexed must not index its
    /// changes a second time.
    fn record_commit(&mut self, commit: &Self::Commit);
}

/// The single construction point for concrete domain objects
pub trait ObjectFactory {
    type Change: GenericChange;
    type Commit: GenericCommit<Change = Self::Change>;
    type History: GenericHistory<Commit = Self::Commit>;

    fn create_change(&self) -> Self::Change;
    fn create_commit(&self) -> Self::Commit;
    fn create_history(&self) -> Self::History;
}
