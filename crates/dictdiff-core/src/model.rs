//! Collaborator interfaces consumed by change tracking and replay.
//!
//! Live model elements are never held by a change record. A record keeps
//! the element's [`ModelElementRef`] and asks an [`IdentityRegistry`] for a
//! [`ElementHandle`] when it needs the element. The handle is only valid
//! for the model that issued it and only until that model reloads.

use std::collections::BTreeMap;

use dictdiff_core_types::{CommitId, ModelElementRef};

/// Opaque key of a live element inside one model instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Anything that can name itself with an identity token
pub trait ModelElement {
    fn element_ref(&self) -> ModelElementRef;
}

/// Receiver of human-readable annotation lines
pub trait AnnotationSink {
    fn append_info(&mut self, text: &str);
}

/// Token to live-element lookup.
///
/// Resolving a token whose element was deleted returns `None`.
pub trait IdentityRegistry {
    fn resolve(&self, token: &ModelElementRef) -> Option<ElementHandle>;
}

/// A live model whose elements carry annotation messages
pub trait AnnotatedModel {
    /// Drop every annotation message on every element
    fn clear_messages(&mut self);

    /// Annotation sink of the element behind `handle`, if still alive
    fn annotation_sink(&mut self, handle: ElementHandle) -> Option<&mut dyn AnnotationSink>;

    /// Current messages of every annotated element, keyed by token
    fn annotation_snapshot(&self) -> BTreeMap<ModelElementRef, Vec<String>>;
}

/// Records the model's annotation state as the marking for a point in history
pub trait MarkingRegistrar {
    fn register_current_marking(&mut self, commit_id: CommitId, model: &dyn AnnotatedModel);
}
