//! Item construction by registered type name.

use std::collections::BTreeMap;
use std::sync::Arc;

use stockroom_core::{DomainError, DomainResult};

use crate::item::{Item, ItemKind, ItemSpec};

/// Builds items of one concrete kind.
///
/// `detail` is the kind's extra attribute in string form (warranty months, size).
pub trait ItemFactory: core::fmt::Debug + Send + Sync {
    fn create(&self, spec: ItemSpec, detail: Option<&str>) -> DomainResult<Item>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ElectronicFactory;

impl ItemFactory for ElectronicFactory {
    fn create(&self, spec: ItemSpec, detail: Option<&str>) -> DomainResult<Item> {
        let warranty_months = match detail.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => d.parse::<u32>().map_err(|_| {
                DomainError::validation(format!(
                    "warranty months must be a non-negative integer, got '{d}'"
                ))
            })?,
            None => 0,
        };
        Item::new(spec, ItemKind::Electronic { warranty_months })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ApparelFactory;

impl ItemFactory for ApparelFactory {
    fn create(&self, spec: ItemSpec, detail: Option<&str>) -> DomainResult<Item> {
        let size = detail.map(str::trim).unwrap_or_default().to_string();
        if size.contains([',', '\n', '\r']) {
            return Err(DomainError::validation("size contains a forbidden character"));
        }
        Item::new(spec, ItemKind::Apparel { size })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GenericFactory;

impl ItemFactory for GenericFactory {
    fn create(&self, spec: ItemSpec, _detail: Option<&str>) -> DomainResult<Item> {
        Item::new(spec, ItemKind::Generic)
    }
}

/// Registry of item factories keyed by case-insensitive type name.
#[derive(Debug, Clone, Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Arc<dyn ItemFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `electronic`, `apparel` and `generic` types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("electronic", Arc::new(ElectronicFactory));
        registry.register("apparel", Arc::new(ApparelFactory));
        registry.register("generic", Arc::new(GenericFactory));
        registry
    }

    /// Register under `type_name`, returning any factory it displaced.
    pub fn register(
        &mut self,
        type_name: &str,
        factory: Arc<dyn ItemFactory>,
    ) -> Option<Arc<dyn ItemFactory>> {
        self.factories.insert(normalize(type_name), factory)
    }

    pub fn unregister(&mut self, type_name: &str) -> Option<Arc<dyn ItemFactory>> {
        self.factories.remove(&normalize(type_name))
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<dyn ItemFactory>> {
        self.factories.get(&normalize(type_name)).cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(&normalize(type_name))
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Build an item with the factory registered under `type_name`.
    pub fn create(
        &self,
        type_name: &str,
        spec: ItemSpec,
        detail: Option<&str>,
    ) -> DomainResult<Item> {
        let factory = self
            .get(type_name)
            .ok_or_else(|| DomainError::not_found(format!("item type '{type_name}'")))?;
        factory.create(spec, detail)
    }
}

fn normalize(type_name: &str) -> String {
    type_name.trim().to_lowercase()
}
