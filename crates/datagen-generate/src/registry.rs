use std::collections::HashMap;

use rand::{Rng, RngCore};

use datagen_core::DocumentId;

use crate::errors::GenerationError;

/// Identifiers written so far in a run, per collection.
///
/// A collection gets an entry when its generation starts, so a missing entry
/// means the collection has not been reached yet.
#[derive(Debug, Default)]
pub struct IdRegistry {
    ids: HashMap<String, Vec<DocumentId>>,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) tracking a collection with an empty id list.
    pub fn begin_collection(&mut self, collection: &str) {
        self.ids.insert(collection.to_string(), Vec::new());
    }

    pub fn record(&mut self, collection: &str, id: DocumentId) {
        self.ids.entry(collection.to_string()).or_default().push(id);
    }

    pub fn ids(&self, collection: &str) -> Option<&[DocumentId]> {
        self.ids.get(collection).map(Vec::as_slice)
    }

    pub fn total(&self) -> usize {
        self.ids.values().map(Vec::len).sum()
    }

    /// Pick a uniformly random id already written to `collection`.
    pub fn pick(
        &self,
        field: &str,
        collection: &str,
        rng: &mut dyn RngCore,
    ) -> Result<&DocumentId, GenerationError> {
        let ids = self.ids.get(collection).ok_or_else(|| {
            GenerationError::InvalidTemplate(format!(
                "field with name '{field}' requests reference to collection '{collection}' \
                 which does not exist; make sure that any collection referred to is defined \
                 before the request"
            ))
        })?;
        if ids.is_empty() {
            return Err(GenerationError::InvalidTemplate(format!(
                "field with name '{field}' requests reference to collection '{collection}' \
                 which has no documents yet"
            )));
        }
        Ok(&ids[rng.random_range(0..ids.len())])
    }
}
