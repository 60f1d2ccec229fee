//! Generic construction driver.
//!
//! Rebuilds concrete commits from interchange documents using only the
//! factory it is handed, and feeds each rebuilt commit into a history.

use dictdiff_core_types::schema::OP_MATERIALIZE;

use crate::document::{ChangeDocument, CommitDocument};
use crate::errors::Result;
use crate::traits::{GenericChange, GenericCommit, GenericHistory, ObjectFactory};

/// Build one sealed commit from `doc` and record it in `history`.
///
/// Changes are appended in document order. The history only sees the
/// commit once every change has been appended and the commit is sealed.
///
/// # Errors
///
/// Propagates `CommitSealed` if the factory hands out a commit that is
/// already sealed.
pub fn materialize_commit<F: ObjectFactory>(
    factory: &F,
    history: &mut F::History,
    doc: &CommitDocument,
) -> Result<F::Commit> {
    let commit = build_commit(factory, doc)?;
    history.record_commit(&commit);
    Ok(commit)
}

/// Build every commit in a JSON array of documents, in array order.
///
/// All commits are built before any is recorded: on error `history` is
/// left exactly as it was.
///
/// # Errors
///
/// Returns `MalformedDocument` if `json` does not parse, or the first
/// error raised while building a commit.
pub fn materialize_all<F: ObjectFactory>(
    factory: &F,
    history: &mut F::History,
    json: &str,
) -> Result<Vec<F::Commit>> {
    let docs = CommitDocument::list_from_json(json)?;
    let commits = docs
        .iter()
        .map(|doc| build_commit(factory, doc))
        .collect::<Result<Vec<_>>>()?;

    for commit in &commits {
        history.record_commit(commit);
    }
    Ok(commits)
}

fn build_commit<F: ObjectFactory>(factory: &F, doc: &CommitDocument) -> Result<F::Commit> {
    tracing::debug!(
        op = OP_MATERIALIZE,
        commit_id = %doc.commit_id,
        changes = doc.changes.len(),
    );

    let mut commit = factory.create_commit();
    commit.restore_identity(doc.commit_id, doc.created_at);

    for change_doc in &doc.changes {
        let mut change = factory.create_change();
        change.populate(change_doc);
        commit.append_change(change)?;
    }

    commit.seal();
    Ok(commit)
}

/// Produce the interchange form of any commit.
pub fn export_commit<C: GenericCommit>(commit: &C) -> CommitDocument {
    CommitDocument {
        commit_id: commit.commit_id(),
        created_at: commit.created_at(),
        changes: commit
            .changes()
            .iter()
            .map(GenericChange::to_document)
            .collect::<Vec<ChangeDocument>>(),
    }
}
