//! Shared catalog state and its persistence wiring.

use std::sync::{Arc, RwLock};

use anyhow::Context;
use stockroom_catalog::{ActivityLog, CatalogManager, Category, FactoryRegistry, ItemSpec};
use stockroom_core::DomainResult;
use stockroom_infra::CatalogStore;

use crate::app::errors::ApiError;

/// Result of a mutation applied through [`AppServices::mutate`].
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    /// Whether the tree was saved afterwards. A failed save is logged, not rolled back.
    pub persisted: bool,
}

/// The catalog manager behind one lock, plus the store it is saved to.
///
/// Mutations take the write lock and save while still holding it, so the stored
/// tree always matches a state the catalog actually passed through.
pub struct AppServices {
    catalog: RwLock<CatalogManager>,
    store: Arc<dyn CatalogStore>,
}

impl AppServices {
    pub fn new(manager: CatalogManager, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog: RwLock::new(manager),
            store,
        }
    }

    /// Load the catalog from `store`, seeding (and saving) the default catalog when
    /// nothing is stored yet. Built-in observers watch the whole tree.
    pub fn bootstrap(
        store: Arc<dyn CatalogStore>,
        activity_capacity: usize,
    ) -> anyhow::Result<Self> {
        let registry = FactoryRegistry::with_defaults();

        let root = match store.load(&registry).context("loading stored catalog")? {
            Some(root) => root,
            None => {
                let root = seed_catalog(&registry).context("building default catalog")?;
                match store.save(&root) {
                    Ok(()) => tracing::info!("seeded default catalog"),
                    Err(e) => tracing::warn!(error = %e, "default catalog not saved"),
                }
                root
            }
        };

        let activity = ActivityLog::new(activity_capacity);
        let mut manager = CatalogManager::with_activity(root, registry, activity);
        manager.attach_default_observers();
        Ok(Self::new(manager, store))
    }

    pub fn read<T>(&self, f: impl FnOnce(&CatalogManager) -> T) -> Result<T, ApiError> {
        let catalog = self.catalog.read().map_err(|_| ApiError::Unavailable)?;
        Ok(f(&catalog))
    }

    /// Apply `f` under the write lock and save the tree if it succeeded.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut CatalogManager) -> DomainResult<T>,
    ) -> Result<Applied<T>, ApiError> {
        let mut catalog = self.catalog.write().map_err(|_| ApiError::Unavailable)?;
        let value = f(&mut catalog)?;

        let persisted = match self.store.save(catalog.root()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "catalog save failed; in-memory state kept");
                let message = format!("Error: could not save catalog ({e})");
                catalog.activity().push(message);
                false
            }
        };
        Ok(Applied { value, persisted })
    }
}

/// Default catalog used when nothing has been stored yet.
pub fn seed_catalog(registry: &FactoryRegistry) -> DomainResult<Category> {
    let mut root = Category::new("Global Inventory")?;
    let mut electronics = Category::new("Electronics")?;
    let mut computers = Category::new("Computers")?;
    let mut audio = Category::new("Audio")?;
    let mut apparel = Category::new("Apparel")?;

    let item = |tag: &str, spec: ItemSpec| registry.create(tag, spec, None);

    computers.add_child(item("electronic", ItemSpec::new("Laptop", 1200, 10, 5))?);
    computers.add_child(item("electronic", ItemSpec::new("Smartphone", 800, 20, 8))?);
    audio.add_child(item("electronic", ItemSpec::new("Headphones", 150, 2, 5))?);
    apparel.add_child(item("apparel", ItemSpec::new("T-Shirt", 30, 15, 5))?);
    apparel.add_child(item("apparel", ItemSpec::new("Jeans", 70, 8, 3))?);

    electronics.add_child(computers);
    electronics.add_child(audio);
    root.add_child(electronics);
    root.add_child(apparel);
    Ok(root)
}
