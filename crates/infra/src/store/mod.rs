//! Catalog persistence boundary.
//!
//! The in-memory catalog stays authoritative: a failed save is reported to the
//! caller and never rolls anything back.

pub mod flat_file;
pub mod in_memory;
pub mod r#trait;

pub use flat_file::FlatFileStore;
pub use in_memory::InMemoryCatalogStore;
pub use r#trait::{CatalogStore, PersistenceError};
