//! Change records: one typed mutation against one model element.
//!
//! A record stores the target's identity token, never the element. The
//! text fields are meaningful only for the kinds that use them:
//!
//! | kind     | field | before | after |
//! |----------|-------|--------|-------|
//! | `Add`    | -     | -      | -     |
//! | `Remove` | yes   | yes    | -     |
//! | `Modify` | yes   | yes    | yes   |
//!
//! Text supplied for an unused slot is discarded at construction.

use dictdiff_core_types::ModelElementRef;
use dictdiff_versioning::{ChangeDocument, GenericChange};
use serde::{Deserialize, Serialize};

use crate::canonical::equals_canonical;
use crate::errors::{DictDiffError, Result};
use crate::model::{AnnotatedModel, AnnotationSink, ElementHandle, IdentityRegistry, ModelElement};

/// Closed set of change kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Remove,
    Modify,
}

impl ChangeKind {
    /// Stable interchange code
    pub fn code(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Remove => "remove",
            ChangeKind::Modify => "modify",
        }
    }

    /// Parse an interchange code; `None` for anything else
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "add" => Some(ChangeKind::Add),
            "remove" => Some(ChangeKind::Remove),
            "modify" => Some(ChangeKind::Modify),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind as stored on a record.
///
/// Only the versioning framework's population path can yield
/// `Unrecognized`: a corrupt or newer interchange document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordedKind {
    Known(ChangeKind),
    Unrecognized(String),
}

impl Default for RecordedKind {
    fn default() -> Self {
        RecordedKind::Known(ChangeKind::Add)
    }
}

impl From<String> for RecordedKind {
    fn from(code: String) -> Self {
        match ChangeKind::from_code(&code) {
            Some(kind) => RecordedKind::Known(kind),
            None => RecordedKind::Unrecognized(code),
        }
    }
}

impl From<RecordedKind> for String {
    fn from(kind: RecordedKind) -> Self {
        match kind {
            RecordedKind::Known(kind) => kind.code().to_string(),
            RecordedKind::Unrecognized(code) => code,
        }
    }
}

/// One atomic recorded mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    target: ModelElementRef,
    kind: RecordedKind,
    #[serde(default)]
    field: String,
    #[serde(default)]
    before: String,
    #[serde(default)]
    after: String,
}

impl ChangeRecord {
    /// Record a change to `element`.
    ///
    /// Text for slots the kind does not use is dropped: everything for
    /// `Add`, `after` for `Remove`.
    pub fn new(
        element: &impl ModelElement,
        kind: ChangeKind,
        field: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
    ) -> Self {
        let (field, before, after) = match kind {
            ChangeKind::Add => (String::new(), String::new(), String::new()),
            ChangeKind::Remove => (field.into(), before.into(), String::new()),
            ChangeKind::Modify => (field.into(), before.into(), after.into()),
        };
        Self {
            target: element.element_ref(),
            kind: RecordedKind::Known(kind),
            field,
            before,
            after,
        }
    }

    /// `element` was added
    pub fn added(element: &impl ModelElement) -> Self {
        Self::new(element, ChangeKind::Add, "", "", "")
    }

    /// `field` of `element` was removed; it previously held `before`
    pub fn removed(
        element: &impl ModelElement,
        field: impl Into<String>,
        before: impl Into<String>,
    ) -> Self {
        Self::new(element, ChangeKind::Remove, field, before, "")
    }

    /// `field` of `element` changed from `before` to `after`
    pub fn modified(
        element: &impl ModelElement,
        field: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
    ) -> Self {
        Self::new(element, ChangeKind::Modify, field, before, after)
    }

    /// Identity token of the target; never the live element
    pub fn target_ref(&self) -> ModelElementRef {
        self.target
    }

    pub fn recorded_kind(&self) -> &RecordedKind {
        &self.kind
    }

    /// The change kind.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedChangeKind` when the stored kind is outside
    /// the closed enumeration.
    pub fn kind(&self) -> Result<ChangeKind> {
        match &self.kind {
            RecordedKind::Known(kind) => Ok(*kind),
            RecordedKind::Unrecognized(code) => Err(DictDiffError::UnrecognizedChangeKind {
                code: code.clone(),
                target: self.target,
                position: None,
            }),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn before(&self) -> &str {
        &self.before
    }

    pub fn after(&self) -> &str {
        &self.after
    }

    /// A `Modify` whose values differ only in whitespace formatting
    pub fn is_cosmetic(&self) -> bool {
        matches!(self.kind, RecordedKind::Known(ChangeKind::Modify))
            && equals_canonical(&self.before, &self.after)
    }

    /// Current live element for the target, if it still exists
    pub fn resolve<R: IdentityRegistry + ?Sized>(&self, registry: &R) -> Option<ElementHandle> {
        registry.resolve(&self.target)
    }

    /// The annotation line this record produces.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedChangeKind` for a corrupt stored kind.
    pub fn annotation_text(&self) -> Result<String> {
        let text = match self.kind()? {
            ChangeKind::Add => "Element was added".to_string(),
            ChangeKind::Remove => format!("Removed {} (was: {})", self.field, self.before),
            ChangeKind::Modify => format!(
                "Modified {} (was: {}, now: {})",
                self.field, self.before, self.after
            ),
        };
        Ok(text)
    }

    /// Append this record's annotation to a resolved element.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedChangeKind` for a corrupt stored kind; the
    /// sink is left untouched in that case.
    pub fn apply_annotation(&self, element: &mut dyn AnnotationSink) -> Result<()> {
        let text = self.annotation_text()?;
        element.append_info(&text);
        Ok(())
    }

    /// Resolve the target in `registry` and annotate it in `model`.
    ///
    /// Returns `Ok(false)` when the target no longer exists. The kind is
    /// checked before resolution so a corrupt record is reported even if
    /// its target is gone.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedChangeKind` for a corrupt stored kind.
    pub fn apply_to<M, R>(&self, model: &mut M, registry: &R) -> Result<bool>
    where
        M: AnnotatedModel + ?Sized,
        R: IdentityRegistry + ?Sized,
    {
        self.kind()?;
        let Some(handle) = self.resolve(registry) else {
            tracing::debug!(target_ref = %self.target, "change target did not resolve");
            return Ok(false);
        };
        match model.annotation_sink(handle) {
            Some(sink) => {
                self.apply_annotation(sink)?;
                Ok(true)
            }
            None => {
                tracing::debug!(target_ref = %self.target, "resolved handle has no live element");
                Ok(false)
            }
        }
    }
}

impl GenericChange for ChangeRecord {
    fn target(&self) -> ModelElementRef {
        self.target
    }

    fn populate(&mut self, doc: &ChangeDocument) {
        self.target = doc.target;
        self.kind = RecordedKind::from(doc.kind.clone());
        self.field = doc.field.clone();
        self.before = doc.before.clone();
        self.after = doc.after.clone();
    }

    fn to_document(&self) -> ChangeDocument {
        ChangeDocument {
            target: self.target,
            kind: String::from(self.kind.clone()),
            field: self.field.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
        }
    }
}
