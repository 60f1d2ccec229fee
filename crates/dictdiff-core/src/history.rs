//! Per-element history of recorded changes.
//!
//! Every record gets a global sequence number when it is recorded. The
//! per-element lists are append-only, so they are always in sequence
//! order regardless of which commit a record came from.
//!
//! Only sealed commits are indexed, and each commit at most once, so a
//! record of a retained commit holds exactly one position.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use dictdiff_core_types::{CommitId, ModelElementRef};
use dictdiff_versioning::GenericHistory;

use crate::change::ChangeRecord;
use crate::commit::Commit;
use crate::errors::{DictDiffError, Result};
use crate::model::ModelElement;

/// A record together with its position in global recording order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedChange {
    sequence: u64,
    commit_id: Option<CommitId>,
    change: ChangeRecord,
}

impl SequencedChange {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Originating commit, when recorded as part of one
    pub fn commit_id(&self) -> Option<CommitId> {
        self.commit_id
    }

    pub fn change(&self) -> &ChangeRecord {
        &self.change
    }
}

/// Token to ordered change list
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    entries: BTreeMap<ModelElementRef, Vec<SequencedChange>>,
    recorded: BTreeSet<CommitId>,
    next_sequence: u64,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, commit_id: Option<CommitId>, change: ChangeRecord) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries
            .entry(change.target_ref())
            .or_default()
            .push(SequencedChange {
                sequence,
                commit_id,
                change,
            });
        sequence
    }

    /// Append one record under its target; returns its sequence number
    pub fn record(&mut self, change: ChangeRecord) -> u64 {
        self.append(None, change)
    }

    /// Append every record of a sealed `commit` in recording order.
    ///
    /// Returns whether the commit was indexed. An open commit, or one
    /// already recorded, is skipped.
    pub fn record_commit(&mut self, commit: &Commit) -> bool {
        if !commit.is_sealed() {
            tracing::debug!(commit_id = %commit.id(), "skipping open commit");
            return false;
        }
        if !self.recorded.insert(commit.id()) {
            tracing::debug!(commit_id = %commit.id(), "commit already recorded");
            return false;
        }
        for change in commit.records() {
            self.append(Some(commit.id()), change.clone());
        }
        true
    }

    /// Whether the commit `id` has been indexed
    pub fn contains_commit(&self, id: &CommitId) -> bool {
        self.recorded.contains(id)
    }

    /// Changes recorded for `token`, oldest first; empty if none
    pub fn changes_for(&self, token: &ModelElementRef) -> &[SequencedChange] {
        self.entries.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// [`Self::changes_for`] keyed by a live element
    pub fn changes_for_element(&self, element: &impl ModelElement) -> &[SequencedChange] {
        self.changes_for(&element.element_ref())
    }

    /// Tokens with at least one recorded change, in token order
    pub fn tracked_elements(&self) -> impl Iterator<Item = &ModelElementRef> {
        self.entries.keys()
    }

    /// Total number of recorded changes
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GenericHistory for HistoryIndex {
    type Commit = Commit;

    fn record_commit(&mut self, commit: &Commit) {
        HistoryIndex::record_commit(self, commit);
    }
}

/// History index behind a single mutex, for callers on several threads
#[derive(Debug, Clone, Default)]
pub struct SharedHistory {
    inner: Arc<Mutex<HistoryIndex>>,
}

impl SharedHistory {
    pub fn new(index: HistoryIndex) -> Self {
        Self {
            inner: Arc::new(Mutex::new(index)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HistoryIndex>> {
        self.inner.lock().map_err(|_| DictDiffError::LockPoisoned {
            resource: "history_index".to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns `LockPoisoned` if a previous holder panicked.
    pub fn record(&self, change: ChangeRecord) -> Result<u64> {
        Ok(self.lock()?.record(change))
    }

    /// See [`HistoryIndex::record_commit`].
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if a previous holder panicked.
    pub fn record_commit(&self, commit: &Commit) -> Result<bool> {
        Ok(self.lock()?.record_commit(commit))
    }

    /// Owned copy of the changes for `token`
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if a previous holder panicked.
    pub fn changes_for(&self, token: &ModelElementRef) -> Result<Vec<SequencedChange>> {
        Ok(self.lock()?.changes_for(token).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::DictionaryElement;

    #[test]
    fn test_unknown_token_has_empty_history() {
        let index = HistoryIndex::new();
        assert!(index.changes_for(&ModelElementRef::new()).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_sequences_are_global_across_targets() {
        let a = DictionaryElement::new("A");
        let b = DictionaryElement::new("B");
        let mut index = HistoryIndex::new();

        let s0 = index.record(ChangeRecord::added(&a));
        let s1 = index.record(ChangeRecord::added(&b));
        let s2 = index.record(ChangeRecord::removed(&a, "unit", "m"));

        assert_eq!((s0, s1, s2), (0, 1, 2));
        let seqs: Vec<_> = index
            .changes_for_element(&a)
            .iter()
            .map(SequencedChange::sequence)
            .collect();
        assert_eq!(seqs, vec![0, 2]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_record_commit_tags_commit_id() {
        let a = DictionaryElement::new("A");
        let mut commit = Commit::new();
        commit.push(ChangeRecord::added(&a)).unwrap();
        commit.seal();
        let mut index = HistoryIndex::new();

        assert!(index.record_commit(&commit));

        assert!(index.contains_commit(&commit.id()));
        let entry = &index.changes_for(&a.id())[0];
        assert_eq!(entry.commit_id(), Some(commit.id()));
        assert_eq!(entry.change(), &commit.records()[0]);
    }

    #[test]
    fn test_shared_history_across_threads() {
        let shared = SharedHistory::default();
        let element = DictionaryElement::new("A");
        let token = element.id();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                let element = element.clone();
                std::thread::spawn(move || {
                    shared
                        .record(ChangeRecord::modified(&element, "max", i.to_string(), "x"))
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let changes = shared.changes_for(&token).unwrap();
        assert_eq!(changes.len(), 4);
        assert!(changes.windows(2).all(|w| w[0].sequence() < w[1].sequence()));
    }
}
