use dictdiff_core::{Dictionary, DictionaryElement, IdentityTable, ModelElementRef};

/// A dictionary with its identity table
#[allow(dead_code)]
pub struct Session {
    pub dict: Dictionary,
    pub table: IdentityTable,
}

#[allow(dead_code)]
impl Session {
    pub fn new() -> Self {
        Self {
            dict: Dictionary::new(),
            table: IdentityTable::new(),
        }
    }

    /// Insert a named element and return a detached copy to record against
    pub fn add(&mut self, name: &str) -> DictionaryElement {
        let element = DictionaryElement::new(name);
        self.dict.insert(element.clone(), &mut self.table);
        element
    }

    /// Current accumulated annotation text of the element behind `token`
    pub fn text_of(&self, token: &ModelElementRef) -> String {
        self.dict
            .find(token)
            .map(DictionaryElement::annotation_text)
            .unwrap_or_default()
    }

    /// Current messages of the element behind `token`
    pub fn messages_of(&self, token: &ModelElementRef) -> Vec<String> {
        self.dict
            .find(token)
            .map(|e| e.messages().to_vec())
            .unwrap_or_default()
    }
}
