//! In-memory dictionary model implementing the collaborator traits.
//!
//! Elements live in an arena behind opaque handles. The identity table
//! maps tokens to handles and is rebound on every reload, which is what
//! lets a commit replay against a model it was not recorded on.

use std::collections::{BTreeMap, HashMap};

use dictdiff_core_types::{CommitId, ModelElementRef};

use crate::model::{
    AnnotatedModel, AnnotationSink, ElementHandle, IdentityRegistry, MarkingRegistrar,
    ModelElement,
};

/// A live element of the in-memory dictionary
///
/// Messages are transient annotation state; they are not part of the
/// element's persisted content and do not survive a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryElement {
    id: ModelElementRef,
    name: String,
    messages: Vec<String>,
}

impl DictionaryElement {
    /// Create an element with a fresh identity token
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(ModelElementRef::new(), name)
    }

    /// Create an element under an existing identity token
    pub fn with_id(id: ModelElementRef, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> ModelElementRef {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Accumulated annotation text, one message per line
    pub fn annotation_text(&self) -> String {
        self.messages.join("\n")
    }
}

impl ModelElement for DictionaryElement {
    fn element_ref(&self) -> ModelElementRef {
        self.id
    }
}

impl AnnotationSink for DictionaryElement {
    fn append_info(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

/// Token to handle lookup table
///
/// Kept apart from [`Dictionary`] so a replay can read the table while
/// mutating the model.
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    handles: HashMap<ModelElementRef, ElementHandle>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `token` at `handle`, replacing any previous binding
    pub fn bind(&mut self, token: ModelElementRef, handle: ElementHandle) {
        self.handles.insert(token, handle);
    }

    /// Forget `token`; later lookups resolve to nothing
    pub fn unbind(&mut self, token: &ModelElementRef) -> Option<ElementHandle> {
        self.handles.remove(token)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl IdentityRegistry for IdentityTable {
    fn resolve(&self, token: &ModelElementRef) -> Option<ElementHandle> {
        self.handles.get(token).copied()
    }
}

/// In-memory dictionary model
///
/// Elements live in an arena keyed by [`ElementHandle`]. Handles are never
/// reused, so a stale handle from before a reload resolves to nothing.
/// Not thread-safe - designed for a single editing session.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    elements: BTreeMap<ElementHandle, DictionaryElement>,
    next_handle: u64,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_handle(&mut self) -> ElementHandle {
        let handle = ElementHandle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Add an element and bind its token in `table`
    pub fn insert(
        &mut self,
        element: DictionaryElement,
        table: &mut IdentityTable,
    ) -> ElementHandle {
        let handle = self.allocate_handle();
        table.bind(element.id, handle);
        self.elements.insert(handle, element);
        handle
    }

    /// Delete the element behind `token` and unbind it
    pub fn remove(
        &mut self,
        token: &ModelElementRef,
        table: &mut IdentityTable,
    ) -> Option<DictionaryElement> {
        let handle = table.unbind(token)?;
        self.elements.remove(&handle)
    }

    /// Destroy and recreate every element under fresh handles.
    ///
    /// Tokens and content survive; annotation messages and old handles
    /// do not. Rebinds every token in `table`.
    pub fn reload(&mut self, table: &mut IdentityTable) {
        let old = std::mem::take(&mut self.elements);
        for (_, element) in old {
            let fresh = DictionaryElement::with_id(element.id, element.name);
            self.insert(fresh, table);
        }
    }

    pub fn get(&self, handle: ElementHandle) -> Option<&DictionaryElement> {
        self.elements.get(&handle)
    }

    /// Look up a live element by token, scanning the arena
    pub fn find(&self, token: &ModelElementRef) -> Option<&DictionaryElement> {
        self.elements.values().find(|e| &e.id == token)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl AnnotatedModel for Dictionary {
    fn clear_messages(&mut self) {
        for element in self.elements.values_mut() {
            element.messages.clear();
        }
    }

    fn annotation_sink(&mut self, handle: ElementHandle) -> Option<&mut dyn AnnotationSink> {
        self.elements
            .get_mut(&handle)
            .map(|e| e as &mut dyn AnnotationSink)
    }

    fn annotation_snapshot(&self) -> BTreeMap<ModelElementRef, Vec<String>> {
        self.elements
            .values()
            .filter(|e| !e.messages.is_empty())
            .map(|e| (e.id, e.messages.clone()))
            .collect()
    }
}

/// A captured marking: annotation state right after a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marking {
    pub commit_id: CommitId,
    pub annotations: BTreeMap<ModelElementRef, Vec<String>>,
}

/// Marking registrar that keeps every marking in memory
#[derive(Debug, Clone, Default)]
pub struct MarkingLog {
    markings: Vec<Marking>,
}

impl MarkingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markings(&self) -> &[Marking] {
        &self.markings
    }

    pub fn latest(&self) -> Option<&Marking> {
        self.markings.last()
    }
}

impl MarkingRegistrar for MarkingLog {
    fn register_current_marking(&mut self, commit_id: CommitId, model: &dyn AnnotatedModel) {
        self.markings.push(Marking {
            commit_id,
            annotations: model.annotation_snapshot(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_binds_token() {
        let mut dict = Dictionary::new();
        let mut table = IdentityTable::new();
        let element = DictionaryElement::new("Speed");
        let token = element.id();

        let handle = dict.insert(element, &mut table);

        assert_eq!(table.resolve(&token), Some(handle));
        assert_eq!(dict.get(handle).map(|e| e.name()), Some("Speed"));
    }

    #[test]
    fn test_removed_element_no_longer_resolves() {
        let mut dict = Dictionary::new();
        let mut table = IdentityTable::new();
        let element = DictionaryElement::new("Speed");
        let token = element.id();
        dict.insert(element, &mut table);

        let removed = dict.remove(&token, &mut table);

        assert!(removed.is_some());
        assert_eq!(table.resolve(&token), None);
        assert!(dict.is_empty());
    }

    #[test]
    fn test_reload_issues_fresh_handles_for_same_tokens() {
        let mut dict = Dictionary::new();
        let mut table = IdentityTable::new();
        let element = DictionaryElement::new("Speed");
        let token = element.id();
        let before = dict.insert(element, &mut table);

        dict.reload(&mut table);

        let after = table.resolve(&token).unwrap();
        assert_ne!(before, after);
        assert!(dict.get(before).is_none());
        assert_eq!(dict.get(after).map(|e| e.id()), Some(token));
    }

    #[test]
    fn test_reload_drops_messages() {
        let mut dict = Dictionary::new();
        let mut table = IdentityTable::new();
        let handle = dict.insert(DictionaryElement::new("Speed"), &mut table);
        dict.annotation_sink(handle).unwrap().append_info("note");
        assert_eq!(dict.annotation_snapshot().len(), 1);

        dict.reload(&mut table);

        assert!(dict.annotation_snapshot().is_empty());
    }

    #[test]
    fn test_clear_messages_empties_every_element() {
        let mut dict = Dictionary::new();
        let mut table = IdentityTable::new();
        let a = dict.insert(DictionaryElement::new("A"), &mut table);
        let b = dict.insert(DictionaryElement::new("B"), &mut table);
        dict.annotation_sink(a).unwrap().append_info("one");
        dict.annotation_sink(b).unwrap().append_info("two");

        dict.clear_messages();

        assert!(dict.annotation_snapshot().is_empty());
    }

    #[test]
    fn test_marking_log_captures_snapshot() {
        let mut dict = Dictionary::new();
        let mut table = IdentityTable::new();
        let element = DictionaryElement::new("A");
        let token = element.id();
        let handle = dict.insert(element, &mut table);
        dict.annotation_sink(handle).unwrap().append_info("Added element");

        let mut log = MarkingLog::new();
        let commit_id = CommitId::new();
        log.register_current_marking(commit_id, &dict);

        let marking = log.latest().unwrap();
        assert_eq!(marking.commit_id, commit_id);
        assert_eq!(
            marking.annotations.get(&token),
            Some(&vec!["Added element".to_string()])
        );
    }
}
