use std::sync::RwLock;

use stockroom_catalog::{Category, FactoryRegistry};

use super::r#trait::{CatalogStore, PersistenceError};
use crate::codec;

/// In-memory store holding the encoded catalog text.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    contents: RwLock<Option<String>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-encoded text, as if it had been saved earlier.
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(Some(text.into())),
        }
    }

    /// The last saved text, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.read().ok()?.clone()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn load(&self, registry: &FactoryRegistry) -> Result<Option<Category>, PersistenceError> {
        match self.contents() {
            Some(text) => codec::decode(&text, registry).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, root: &Category) -> Result<(), PersistenceError> {
        let text = codec::encode(root);
        if let Ok(mut contents) = self.contents.write() {
            *contents = Some(text);
        }
        Ok(())
    }
}
