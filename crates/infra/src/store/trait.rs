use std::sync::Arc;

use stockroom_catalog::{Category, FactoryRegistry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("stored catalog has no root category")]
    MissingRoot,
}

/// Load/save a whole catalog tree.
pub trait CatalogStore: Send + Sync {
    /// Load the stored tree, or `None` when nothing has been stored yet.
    ///
    /// `registry` resolves item type tags back into item kinds.
    fn load(&self, registry: &FactoryRegistry) -> Result<Option<Category>, PersistenceError>;

    /// Replace the stored tree with `root`.
    fn save(&self, root: &Category) -> Result<(), PersistenceError>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn load(&self, registry: &FactoryRegistry) -> Result<Option<Category>, PersistenceError> {
        (**self).load(registry)
    }

    fn save(&self, root: &Category) -> Result<(), PersistenceError> {
        (**self).save(root)
    }
}
