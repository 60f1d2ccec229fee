//! Construction point handed to the versioning framework.
//!
//! The framework is wired to one factory reference at startup:
//!
//! ```
//! use dictdiff_core::factory::DictionaryObjectFactory;
//! use dictdiff_versioning::{materialize_all, ObjectFactory};
//!
//! let factory = DictionaryObjectFactory::instance();
//! let mut history = factory.create_history();
//! let commits = materialize_all(factory, &mut history, "[]").unwrap();
//! assert!(commits.is_empty());
//! ```
//!
//! Tests that need isolation build their own factory with
//! [`DictionaryObjectFactory::new`] and pass that instead.

use dictdiff_versioning::ObjectFactory;

use crate::change::ChangeRecord;
use crate::commit::Commit;
use crate::history::HistoryIndex;

/// Builds the dictionary domain's change, commit and history types
#[derive(Debug, Default)]
pub struct DictionaryObjectFactory {
    _private: (),
}

static INSTANCE: DictionaryObjectFactory = DictionaryObjectFactory::new();

impl DictionaryObjectFactory {
    /// A separate factory, independent of the process-wide one
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// The process-wide factory
    pub fn instance() -> &'static DictionaryObjectFactory {
        &INSTANCE
    }
}

impl ObjectFactory for DictionaryObjectFactory {
    type Change = ChangeRecord;
    type Commit = Commit;
    type History = HistoryIndex;

    fn create_change(&self) -> ChangeRecord {
        ChangeRecord::default()
    }

    fn create_commit(&self) -> Commit {
        Commit::new()
    }

    fn create_history(&self) -> HistoryIndex {
        HistoryIndex::new()
    }
}
