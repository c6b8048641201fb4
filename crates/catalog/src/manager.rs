//! Catalog Manager: the single entry point for mutating and inspecting a catalog.

use std::sync::Arc;

use chrono::Utc;
use stockroom_core::{DomainError, DomainResult, NodeId};

use crate::activity::ActivityLog;
use crate::command::{CatalogCommand, CatalogState, Effect, RemoveNode};
use crate::factory::FactoryRegistry;
use crate::item::{Item, ItemSpec, StockChange};
use crate::node::Category;
use crate::observer::{LowStockAlert, ObserverId, ObserverRegistry, StateChangeLog, StockObserver};
use crate::report::{HistoryExport, InventoryReport};

/// Owns the tree, the factory registry, the command history and the observers.
///
/// Every mutation is applied fully (observer notifications included) before the
/// call returns. Callers sharing a manager across threads wrap it in one lock.
#[derive(Debug)]
pub struct CatalogManager {
    state: CatalogState,
    history: Vec<CatalogCommand>,
    observers: ObserverRegistry,
    activity: ActivityLog,
}

impl CatalogManager {
    pub fn new(root: Category, registry: FactoryRegistry) -> Self {
        Self::with_activity(root, registry, ActivityLog::default())
    }

    pub fn with_activity(root: Category, registry: FactoryRegistry, activity: ActivityLog) -> Self {
        Self {
            state: CatalogState::new(root, registry),
            history: Vec::new(),
            observers: ObserverRegistry::new(),
            activity,
        }
    }

    pub fn root(&self) -> &Category {
        &self.state.root
    }

    pub fn registry(&self) -> &FactoryRegistry {
        &self.state.registry
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Executed commands, oldest first.
    pub fn history(&self) -> &[CatalogCommand] {
        &self.history
    }

    /// Execute `command`, record it, and notify observers of every stock change.
    ///
    /// A sale blocked by insufficient stock returns the error but stays in the
    /// history, so undoing it later restocks the item. Other failures are not
    /// recorded and leave the catalog untouched.
    pub fn execute_command(&mut self, command: impl Into<CatalogCommand>) -> DomainResult<()> {
        let mut command = command.into();
        let name = command.name();

        match command.execute(&mut self.state) {
            Ok(effect) => {
                let description = command.describe();
                tracing::info!(command = name, %description, "command executed");
                self.activity.push(description);
                self.activity.push(format!("COMMAND EXECUTED: {name}"));
                self.history.push(command);
                self.notify(&effect);
                Ok(())
            }
            Err(err) => {
                let recorded = err.is_recorded_failure();
                tracing::warn!(command = name, error = %err, recorded, "command failed");
                self.activity.push(format!("COMMAND FAILED: {name} ({err})"));
                if recorded {
                    self.history.push(command);
                }
                Err(err)
            }
        }
    }

    /// Pop the most recent command and reverse it. Returns the undone command.
    pub fn undo_last_command(&mut self) -> DomainResult<CatalogCommand> {
        let Some(mut command) = self.history.pop() else {
            tracing::warn!("undo requested with empty history");
            self.activity.push("Error: There is no command for undo.");
            return Err(DomainError::EmptyHistory);
        };
        let name = command.name();

        match command.undo(&mut self.state) {
            Ok(effect) => {
                tracing::info!(command = name, "command undone");
                self.activity.push(format!("UNDO: {name}"));
                self.notify(&effect);
                Ok(command)
            }
            Err(err) => {
                tracing::warn!(command = name, error = %err, "undo failed; command dropped");
                self.activity.push(format!("UNDO FAILED: {name} ({err})"));
                Err(err)
            }
        }
    }

    /// Subscribe `observer` to an item, or to every item in a category's subtree.
    pub fn register_observer(
        &mut self,
        node_id: NodeId,
        observer: Arc<dyn StockObserver>,
    ) -> DomainResult<ObserverId> {
        if !self.state.root.contains(node_id) {
            return Err(DomainError::not_found(format!("node {node_id}")));
        }
        let id = self.observers.register(node_id, observer);
        tracing::debug!(observer = %id, node = %node_id, "observer registered");
        Ok(id)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Subscribe [`LowStockAlert`] then [`StateChangeLog`] to the whole catalog.
    pub fn attach_default_observers(&mut self) -> (ObserverId, ObserverId) {
        let root = self.state.root.id();
        let alert = self
            .observers
            .register(root, Arc::new(LowStockAlert::new(self.activity.clone())));
        let changes = self
            .observers
            .register(root, Arc::new(StateChangeLog::new(self.activity.clone())));
        (alert, changes)
    }

    pub fn generate_report(&self) -> InventoryReport {
        InventoryReport::from_root(&self.state.root)
    }

    pub fn export_history(&self) -> HistoryExport {
        let names = self
            .history
            .iter()
            .rev()
            .map(|c| c.name().to_string())
            .collect();
        HistoryExport::new(Utc::now(), names)
    }

    pub fn render_tree(&self) -> String {
        self.state.root.render()
    }

    pub fn find_item_by_name(&self, name: &str) -> DomainResult<&Item> {
        self.state
            .root
            .find_by_name(name.trim())
            .ok_or_else(|| DomainError::not_found(format!("product '{}'", name.trim())))
    }

    pub fn find_category_by_name(&self, name: &str) -> DomainResult<&Category> {
        self.state
            .root
            .find_category_by_name(name.trim())
            .ok_or_else(|| DomainError::not_found(format!("category '{}'", name.trim())))
    }

    /// Build an item with the factory registered under `type_name`.
    pub fn build_item(
        &self,
        type_name: &str,
        spec: ItemSpec,
        detail: Option<&str>,
    ) -> DomainResult<Item> {
        self.state.registry.create(type_name, spec, detail)
    }

    /// A `RemoveNode` for `target_id`, with its parent resolved from the tree.
    pub fn remove_node_command(&self, target_id: NodeId) -> DomainResult<RemoveNode> {
        if target_id == self.state.root.id() {
            return Err(DomainError::validation("the root category cannot be removed"));
        }
        let parent = self
            .state
            .root
            .parent_of(target_id)
            .ok_or_else(|| DomainError::not_found(format!("node {target_id}")))?;
        Ok(RemoveNode::new(parent.id(), target_id))
    }

    /// Change an item's reorder threshold. Not recorded in the history.
    pub fn set_threshold(&mut self, item_id: NodeId, threshold: u32) -> DomainResult<StockChange> {
        let item = self
            .state
            .root
            .find_item_mut(item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {item_id}")))?;
        let change = item.set_threshold(threshold);
        tracing::info!(item = item.name(), threshold, state = %change.after, "threshold updated");

        self.notify(&Effect {
            stock_changes: vec![(item_id, change)],
        });
        Ok(change)
    }

    /// Change an item's unit price. Audit-logged only.
    pub fn set_price(&mut self, item_id: NodeId, unit_price: u64) -> DomainResult<()> {
        let item = self
            .state
            .root
            .find_item_mut(item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {item_id}")))?;
        let previous = item.unit_price();
        item.set_price(unit_price);
        tracing::info!(item = item.name(), previous, unit_price, "price updated");
        self.activity
            .push(format!("PRICE: {} {previous} -> {unit_price}", item.name()));
        Ok(())
    }

    fn notify(&self, effect: &Effect) {
        for (item_id, _) in &effect.stock_changes {
            if let Some(item) = self.state.root.find_item(*item_id) {
                self.observers.notify(&self.state.root, item);
            }
        }
    }
}
