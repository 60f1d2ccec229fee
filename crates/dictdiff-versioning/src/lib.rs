//! Domain-agnostic versioning framework surface
//!
//! This crate knows how to move commits in and out of their interchange
//! form and how to feed them into a history, but it never names a concrete
//! change, commit or history type. Everything concrete is constructed
//! through an injected [`ObjectFactory`]:
//!
//! - **Traits**: `GenericChange`, `GenericCommit`, `GenericHistory`, `ObjectFactory`
//! - **Interchange**: `CommitDocument` / `ChangeDocument` (JSON)
//! - **Driver**: `materialize_commit`, `materialize_all`, `export_commit`
//!
//! Persisting documents is left to the host.

pub mod document;
pub mod driver;
pub mod errors;
pub mod traits;

pub use document::{ChangeDocument, CommitDocument};
pub use driver::{export_commit, materialize_all, materialize_commit};
pub use errors::{Result, VersioningError};
pub use traits::{GenericChange, GenericCommit, GenericHistory, ObjectFactory};
