//! Inventory domain engine.
//!
//! A composite category/item tree, per-item stock-level classification, a
//! reversible command log that drives every mutation, and observers notified on
//! each stock change. Pure and synchronous: no IO, no HTTP, no storage.

pub mod activity;
pub mod command;
pub mod factory;
pub mod item;
pub mod manager;
pub mod node;
pub mod observer;
pub mod report;
pub mod stock;

pub use activity::{ActivityEntry, ActivityLog, DEFAULT_ACTIVITY_CAPACITY};
pub use command::{
    AddCategory, AddItem, AddItemType, AdjustStock, CatalogCommand, CatalogState, Effect,
    RemoveItemType, RemoveNode,
};
pub use factory::{ApparelFactory, ElectronicFactory, FactoryRegistry, GenericFactory, ItemFactory};
pub use item::{Item, ItemKind, ItemSpec, StockChange, validate_name};
pub use manager::CatalogManager;
pub use node::{CatalogNode, Category};
pub use observer::{LowStockAlert, ObserverId, ObserverRegistry, StateChangeLog, StockObserver};
pub use report::{HistoryExport, InventoryReport, LowStockEntry};
pub use stock::StockState;
