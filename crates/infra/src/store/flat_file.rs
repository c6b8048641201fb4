use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stockroom_catalog::{Category, FactoryRegistry};

use super::r#trait::{CatalogStore, PersistenceError};
use crate::codec;

/// Catalog stored as a flat record file on disk.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
}

impl FlatFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for FlatFileStore {
    fn load(&self, registry: &FactoryRegistry) -> Result<Option<Category>, PersistenceError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no stored catalog");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let root = codec::decode(&text, registry)?;
        tracing::info!(
            path = %self.path.display(),
            items = root.items().len(),
            categories = root.category_count(),
            "catalog loaded"
        );
        Ok(Some(root))
    }

    fn save(&self, root: &Category) -> Result<(), PersistenceError> {
        fs::write(&self.path, codec::encode(root))?;
        tracing::debug!(path = %self.path.display(), "catalog saved");
        Ok(())
    }
}
