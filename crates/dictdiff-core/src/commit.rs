//! Commits: ordered batches of change records from one comparison pass.
//!
//! A commit is append-only while open and immutable once sealed. Replay is
//! read-only with respect to the commit and may run any number of times.

use chrono::{DateTime, Utc};
use dictdiff_core_types::schema::OP_REPLAY;
use dictdiff_core_types::{CommitId, ModelElementRef};
use dictdiff_versioning::{export_commit, CommitDocument, GenericCommit, VersioningError};

use crate::change::ChangeRecord;
use crate::errors::{DictDiffError, Result};
use crate::model::{AnnotatedModel, IdentityRegistry, MarkingRegistrar};
use crate::{log_op_end, log_op_error, log_op_start};

/// Outcome of a successful replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Records whose annotation was applied
    pub applied: usize,
    /// Targets that no longer resolve, in record order
    pub unresolved: Vec<ModelElementRef>,
}

/// An ordered, sealable batch of change records
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    id: CommitId,
    created_at: DateTime<Utc>,
    records: Vec<ChangeRecord>,
    sealed: bool,
}

impl Default for Commit {
    fn default() -> Self {
        Self::new()
    }
}

impl Commit {
    /// Open a new, empty commit
    pub fn new() -> Self {
        Self {
            id: CommitId::new(),
            created_at: Utc::now(),
            records: Vec::new(),
            sealed: false,
        }
    }

    pub fn id(&self) -> CommitId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Records in recording order
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns `CommitSealed` once the commit has been sealed.
    pub fn push(&mut self, record: ChangeRecord) -> Result<()> {
        if self.sealed {
            return Err(DictDiffError::CommitSealed {
                commit_id: self.id.to_string(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Append a record unless it is a whitespace-only modification.
    ///
    /// Returns whether the record was kept.
    ///
    /// # Errors
    ///
    /// Returns `CommitSealed` once the commit has been sealed.
    pub fn push_if_meaningful(&mut self, record: ChangeRecord) -> Result<bool> {
        if record.is_cosmetic() {
            return Ok(false);
        }
        self.push(record)?;
        Ok(true)
    }

    /// Freeze the commit. Idempotent.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Records that are not whitespace-only modifications
    pub fn meaningful_changes(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter().filter(|r| !r.is_cosmetic())
    }

    /// Interchange form of this commit
    pub fn to_document(&self) -> CommitDocument {
        export_commit(self)
    }

    /// Re-apply this commit's records as annotations on `model`.
    ///
    /// Clears every existing message first, then applies each record in
    /// recording order, then registers the resulting state with `marking`.
    /// Unresolved targets are skipped and listed in the report.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedChangeKind` (with its position) at the first
    /// corrupt record. Records before it stay applied and no marking is
    /// registered.
    pub fn replay<M, R, K>(
        &self,
        model: &mut M,
        registry: &R,
        marking: &mut K,
    ) -> Result<ReplayReport>
    where
        M: AnnotatedModel,
        R: IdentityRegistry + ?Sized,
        K: MarkingRegistrar + ?Sized,
    {
        log_op_start!(OP_REPLAY, commit_id = %self.id, records = self.records.len());
        let start = std::time::Instant::now();

        let report = self.replay_impl(model, registry, marking).map_err(|e| {
            log_op_error!(
                OP_REPLAY,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                commit_id = %self.id
            );
            e
        })?;

        log_op_end!(
            OP_REPLAY,
            duration_ms = start.elapsed().as_millis() as u64,
            commit_id = %self.id,
            applied = report.applied,
            unresolved = report.unresolved.len()
        );

        Ok(report)
    }

    fn replay_impl<M, R, K>(
        &self,
        model: &mut M,
        registry: &R,
        marking: &mut K,
    ) -> Result<ReplayReport>
    where
        M: AnnotatedModel,
        R: IdentityRegistry + ?Sized,
        K: MarkingRegistrar + ?Sized,
    {
        model.clear_messages();

        let mut report = ReplayReport::default();
        for (position, record) in self.records.iter().enumerate() {
            let applied = record
                .apply_to(model, registry)
                .map_err(|e| e.at_position(position))?;
            if applied {
                report.applied += 1;
            } else {
                report.unresolved.push(record.target_ref());
            }
        }

        marking.register_current_marking(self.id, &*model);
        Ok(report)
    }
}

impl GenericCommit for Commit {
    type Change = ChangeRecord;

    fn commit_id(&self) -> CommitId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn restore_identity(&mut self, commit_id: CommitId, created_at: DateTime<Utc>) {
        self.id = commit_id;
        self.created_at = created_at;
    }

    fn append_change(&mut self, change: ChangeRecord) -> dictdiff_versioning::Result<()> {
        self.push(change).map_err(|_| VersioningError::CommitSealed {
            commit_id: self.id.to_string(),
        })
    }

    fn seal(&mut self) {
        Commit::seal(self);
    }

    fn changes(&self) -> &[ChangeRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryElement;

    #[test]
    fn test_push_after_seal_is_rejected() {
        let element = DictionaryElement::new("Speed");
        let mut commit = Commit::new();
        commit.push(ChangeRecord::added(&element)).unwrap();
        commit.seal();

        let err = commit.push(ChangeRecord::added(&element)).unwrap_err();

        assert!(matches!(err, DictDiffError::CommitSealed { .. }));
        assert_eq!(commit.len(), 1);
    }

    #[test]
    fn test_generic_append_after_seal_is_rejected() {
        let element = DictionaryElement::new("Speed");
        let mut commit = Commit::new();
        GenericCommit::seal(&mut commit);

        let err = commit
            .append_change(ChangeRecord::added(&element))
            .unwrap_err();

        assert!(matches!(err, VersioningError::CommitSealed { .. }));
    }

    #[test]
    fn test_push_if_meaningful_drops_reformatting() {
        let element = DictionaryElement::new("Speed");
        let mut commit = Commit::new();

        let kept = commit
            .push_if_meaningful(ChangeRecord::modified(&element, "doc", "a\n b", "a b"))
            .unwrap();

        assert!(!kept);
        assert!(commit.is_empty());
    }

    #[test]
    fn test_meaningful_changes_skips_cosmetic_records() {
        let element = DictionaryElement::new("Speed");
        let mut commit = Commit::new();
        commit
            .push(ChangeRecord::modified(&element, "doc", "a  b", "a b"))
            .unwrap();
        commit
            .push(ChangeRecord::modified(&element, "max", "10", "20"))
            .unwrap();

        let fields: Vec<_> = commit.meaningful_changes().map(|r| r.field()).collect();
        assert_eq!(fields, vec!["max"]);
    }

    #[test]
    fn test_document_preserves_identity_and_order() {
        let a = DictionaryElement::new("A");
        let b = DictionaryElement::new("B");
        let mut commit = Commit::new();
        commit.push(ChangeRecord::added(&b)).unwrap();
        commit.push(ChangeRecord::removed(&a, "unit", "m")).unwrap();

        let doc = commit.to_document();

        assert_eq!(doc.commit_id, commit.id());
        assert_eq!(doc.created_at, commit.created_at());
        assert_eq!(doc.changes[0].target, b.id());
        assert_eq!(doc.changes[1].kind, "remove");
    }
}
