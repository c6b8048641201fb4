//! Infrastructure layer: catalog persistence.

pub mod codec;
pub mod store;

pub use store::{CatalogStore, FlatFileStore, InMemoryCatalogStore, PersistenceError};
