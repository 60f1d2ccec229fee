//! dictdiff Core - change tracking and replay for the dictionary model
//!
//! This crate records what changed between two states of a dictionary
//! model and replays it as human-readable annotations:
//! - Whitespace-tolerant canonical comparison of field text
//! - Change records addressed by identity token, never by live reference
//! - Sealable commits with deterministic, repeatable replay
//! - A per-element history index in global recording order
//! - The object factory the generic versioning framework constructs through
//!
//! An in-memory reference model (`Dictionary`, `IdentityTable`,
//! `MarkingLog`) implements the collaborator traits in [`model`].

pub mod canonical;
pub mod change;
pub mod commit;
pub mod dictionary;
pub mod errors;
pub mod factory;
pub mod history;
pub mod logging_facility;
pub mod model;

// Re-export commonly used types
pub use canonical::{canonicalize, equals_canonical};
pub use change::{ChangeKind, ChangeRecord, RecordedKind};
pub use commit::{Commit, ReplayReport};
pub use dictdiff_core_types::{CommitId, ModelElementRef};
pub use dictionary::{Dictionary, DictionaryElement, IdentityTable, Marking, MarkingLog};
pub use errors::{DictDiffError, ExError, ExErrorKind, Result};
pub use factory::DictionaryObjectFactory;
pub use history::{HistoryIndex, SequencedChange, SharedHistory};
pub use model::{
    AnnotatedModel, AnnotationSink, ElementHandle, IdentityRegistry, MarkingRegistrar,
    ModelElement,
};
