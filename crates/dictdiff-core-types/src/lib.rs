//! Core types shared across the dictdiff crates
//!
//! - **Identity tokens**: ModelElementRef, CommitId
//! - **Schema constants**: Canonical field keys and event names

pub mod identity;
pub mod schema;

pub use identity::{CommitId, ModelElementRef};
