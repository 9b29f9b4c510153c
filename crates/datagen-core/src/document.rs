use std::fmt;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Identifier assigned to a document by an output sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentId {
    /// Store-assigned object id, kept as its 24-character hex form.
    ObjectId(String),
    /// Any other identifier (trace sink uuids, non-ObjectId `_id` values).
    Opaque(String),
}

impl DocumentId {
    pub fn as_str(&self) -> &str {
        match self {
            DocumentId::ObjectId(value) | DocumentId::Opaque(value) => value.as_str(),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Typed pointer from one generated document to a document in another collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub collection: String,
    pub id: DocumentId,
    pub database: String,
}

impl Reference {
    pub fn new(collection: impl Into<String>, id: DocumentId, database: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id,
            database: database.into(),
        }
    }
}

/// Serialized in DBRef shape so trace output matches what the store receives.
impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Reference", 3)?;
        state.serialize_field("$ref", &self.collection)?;
        state.serialize_field("$id", &self.id)?;
        state.serialize_field("$db", &self.database)?;
        state.end()
    }
}

/// Generated value for a single document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Reference(Reference),
}

impl FieldValue {
    /// Collapse formatted values: one item becomes a bare string, anything else a list.
    pub fn from_formatted(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            FieldValue::Text(values.remove(0))
        } else {
            FieldValue::List(values)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            FieldValue::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

/// Generated document with fields kept in template declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    fields: Vec<(String, FieldValue)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any earlier value stored under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_existing_field_in_place() {
        let mut document = Document::new();
        document.insert("title", FieldValue::Text("first".to_string()));
        document.insert("tags", FieldValue::List(vec!["a".to_string()]));
        document.insert("title", FieldValue::Text("second".to_string()));

        let keys: Vec<&str> = document.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["title", "tags"]);
        assert_eq!(
            document.get("title").and_then(FieldValue::as_text),
            Some("second")
        );
    }

    #[test]
    fn formatted_values_collapse_single_item() {
        let single = FieldValue::from_formatted(vec!["123-45-6789".to_string()]);
        assert_eq!(single.as_text(), Some("123-45-6789"));

        let many = FieldValue::from_formatted(vec!["1".to_string(), "2".to_string()]);
        assert_eq!(many.as_list().map(|values| values.len()), Some(2));

        let none = FieldValue::from_formatted(Vec::new());
        assert_eq!(none.as_list().map(|values| values.len()), Some(0));
    }
}
