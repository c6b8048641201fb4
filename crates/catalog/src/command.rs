//! Reversible catalog commands.
//!
//! Every mutation of the catalog is a [`CatalogCommand`] value. A command captures
//! whatever it needs to reverse itself while it executes (the created node id, the
//! removed node and its index, the displaced factory), so `undo` never reconstructs
//! anything from ambient state.
//!
//! Undo is unconditional: reversing a stock adjustment applies the inverse mutation
//! even if the original execution was blocked. A blocked sale that stays in the
//! history therefore restocks on undo.

use std::sync::Arc;

use stockroom_core::{DomainError, DomainResult, NodeId};

use crate::factory::{FactoryRegistry, ItemFactory};
use crate::item::{Item, StockChange, validate_name};
use crate::node::{CatalogNode, Category};

/// Mutable state a command executes against.
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub root: Category,
    pub registry: FactoryRegistry,
}

impl CatalogState {
    pub fn new(root: Category, registry: FactoryRegistry) -> Self {
        Self { root, registry }
    }

    fn category_mut(&mut self, id: NodeId) -> DomainResult<&mut Category> {
        self.root
            .find_category_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("category {id}")))
    }

    fn item_mut(&mut self, id: NodeId) -> DomainResult<&mut Item> {
        self.root
            .find_item_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("item {id}")))
    }
}

/// Quantity changes produced by one execute/undo step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effect {
    pub stock_changes: Vec<(NodeId, StockChange)>,
}

impl Effect {
    fn none() -> Self {
        Self::default()
    }

    fn stock(item_id: NodeId, change: StockChange) -> Self {
        Self {
            stock_changes: vec![(item_id, change)],
        }
    }
}

/// Sell or restock an item by a fixed quantity.
#[derive(Debug, Clone)]
pub struct AdjustStock {
    item_id: NodeId,
    qty: u32,
    restock: bool,
    item_name: Option<String>,
}

impl AdjustStock {
    /// Signed form: `delta > 0` restocks, `delta < 0` sells, and zero is an empty restock.
    pub fn new(item_id: NodeId, delta: i64) -> DomainResult<Self> {
        let qty = u32::try_from(delta.unsigned_abs())
            .map_err(|_| DomainError::validation(format!("delta {delta} is out of range")))?;
        Ok(Self::build(item_id, qty, delta >= 0))
    }

    pub fn restock(item_id: NodeId, qty: u32) -> Self {
        Self::build(item_id, qty, true)
    }

    pub fn sell(item_id: NodeId, qty: u32) -> Self {
        Self::build(item_id, qty, false)
    }

    fn build(item_id: NodeId, qty: u32, restock: bool) -> Self {
        Self {
            item_id,
            qty,
            restock,
            item_name: None,
        }
    }

    pub fn item_id(&self) -> NodeId {
        self.item_id
    }

    pub fn delta(&self) -> i64 {
        if self.restock {
            i64::from(self.qty)
        } else {
            -i64::from(self.qty)
        }
    }

    fn is_restock(&self) -> bool {
        self.restock
    }

    fn execute(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let item = state.item_mut(self.item_id)?;
        self.item_name = Some(item.name().to_string());
        let change = if self.is_restock() {
            item.restock(self.qty)?
        } else {
            item.sell(self.qty)?
        };
        Ok(Effect::stock(self.item_id, change))
    }

    fn undo(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let item = state.item_mut(self.item_id)?;
        let change = if self.is_restock() {
            item.deduct(self.qty)
        } else {
            item.restock(self.qty)?
        };
        Ok(Effect::stock(self.item_id, change))
    }
}

/// Create a category under a parent.
#[derive(Debug, Clone)]
pub struct AddCategory {
    parent_id: NodeId,
    name: String,
    parent_name: Option<String>,
    created: Option<NodeId>,
}

impl AddCategory {
    pub fn new(parent_id: NodeId, name: impl Into<String>) -> Self {
        Self {
            parent_id,
            name: name.into(),
            parent_name: None,
            created: None,
        }
    }

    /// Id of the category created by the last execution.
    pub fn created(&self) -> Option<NodeId> {
        self.created
    }

    fn execute(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let name = validate_name(&self.name)?;
        let parent = state.category_mut(self.parent_id)?;
        let category = Category::new(&name)?;
        self.created = Some(category.id());
        self.parent_name = Some(parent.name().to_string());
        self.name = name;
        parent.add_child(category);
        Ok(Effect::none())
    }

    fn undo(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        if let Some(id) = self.created.take() {
            state.category_mut(self.parent_id)?.remove_child(id);
        }
        Ok(Effect::none())
    }
}

/// Attach a pre-built item under a parent.
#[derive(Debug, Clone)]
pub struct AddItem {
    parent_id: NodeId,
    item_id: NodeId,
    item_name: String,
    parent_name: Option<String>,
    pending: Option<Item>,
}

impl AddItem {
    pub fn new(parent_id: NodeId, item: Item) -> Self {
        Self {
            parent_id,
            item_id: item.id(),
            item_name: item.name().to_string(),
            parent_name: None,
            pending: Some(item),
        }
    }

    pub fn item_id(&self) -> NodeId {
        self.item_id
    }

    fn execute(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let parent = state.category_mut(self.parent_id)?;
        let Some(item) = self.pending.take() else {
            let message = format!("item '{}' is already placed", self.item_name);
            return Err(DomainError::validation(message));
        };
        self.parent_name = Some(parent.name().to_string());
        parent.add_child(item);
        Ok(Effect::none())
    }

    fn undo(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let parent = state.category_mut(self.parent_id)?;
        if let Some((_, CatalogNode::Item(item))) = parent.remove_child(self.item_id) {
            self.pending = Some(item);
        }
        Ok(Effect::none())
    }
}

/// Register a factory under a type name.
#[derive(Debug, Clone)]
pub struct AddItemType {
    type_name: String,
    factory: Arc<dyn ItemFactory>,
    displaced: Option<Arc<dyn ItemFactory>>,
}

impl AddItemType {
    pub fn new(type_name: impl Into<String>, factory: Arc<dyn ItemFactory>) -> Self {
        Self {
            type_name: type_name.into(),
            factory,
            displaced: None,
        }
    }

    fn execute(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        self.type_name = validate_name(&self.type_name)?;
        let factory = self.factory.clone();
        self.displaced = state.registry.register(&self.type_name, factory);
        Ok(Effect::none())
    }

    fn undo(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        match self.displaced.take() {
            Some(previous) => {
                state.registry.register(&self.type_name, previous);
            }
            None => {
                state.registry.unregister(&self.type_name);
            }
        }
        Ok(Effect::none())
    }
}

/// Detach a node from its parent, remembering where it was.
#[derive(Debug, Clone)]
pub struct RemoveNode {
    parent_id: NodeId,
    target_id: NodeId,
    removed: Option<(usize, CatalogNode)>,
}

impl RemoveNode {
    pub fn new(parent_id: NodeId, target_id: NodeId) -> Self {
        Self {
            parent_id,
            target_id,
            removed: None,
        }
    }

    /// Index the target occupied before removal.
    pub fn original_index(&self) -> Option<usize> {
        self.removed.as_ref().map(|(index, _)| *index)
    }

    fn execute(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let parent = state.category_mut(self.parent_id)?;
        let Some((index, node)) = parent.remove_child(self.target_id) else {
            let what = format!("node {} under '{}'", self.target_id, parent.name());
            return Err(DomainError::not_found(what));
        };
        tracing::debug!(target_id = %self.target_id, index, "detached node");
        self.removed = Some((index, node));
        Ok(Effect::none())
    }

    fn undo(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let parent = state.category_mut(self.parent_id)?;
        if let Some((index, node)) = self.removed.take() {
            parent.insert_child(index, node);
        }
        Ok(Effect::none())
    }

    fn target_label(&self) -> String {
        match &self.removed {
            Some((_, CatalogNode::Category(c))) => format!("Category '{}'", c.name()),
            Some((_, CatalogNode::Item(i))) => format!("Product '{}'", i.name()),
            None => format!("node {}", self.target_id),
        }
    }
}

/// Unregister a type name, keeping its factory for undo.
#[derive(Debug, Clone)]
pub struct RemoveItemType {
    type_name: String,
    removed: Option<Arc<dyn ItemFactory>>,
}

impl RemoveItemType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            removed: None,
        }
    }

    fn execute(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        let factory = state
            .registry
            .unregister(&self.type_name)
            .ok_or_else(|| DomainError::not_found(format!("item type '{}'", self.type_name)))?;
        self.removed = Some(factory);
        Ok(Effect::none())
    }

    fn undo(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        if let Some(factory) = self.removed.take() {
            state.registry.register(&self.type_name, factory);
        }
        Ok(Effect::none())
    }
}

/// A reversible catalog mutation.
#[derive(Debug, Clone)]
pub enum CatalogCommand {
    AdjustStock(AdjustStock),
    AddCategory(AddCategory),
    AddItem(AddItem),
    AddItemType(AddItemType),
    RemoveNode(RemoveNode),
    RemoveItemType(RemoveItemType),
}

impl CatalogCommand {
    /// Name used in the command history.
    pub fn name(&self) -> &'static str {
        match self {
            CatalogCommand::AdjustStock(c) if c.is_restock() => "AddStock",
            CatalogCommand::AdjustStock(_) => "RemoveStock",
            CatalogCommand::AddCategory(_) => "AddCategory",
            CatalogCommand::AddItem(_) => "AddItem",
            CatalogCommand::AddItemType(_) => "AddItemType",
            CatalogCommand::RemoveNode(_) => "RemoveNode",
            CatalogCommand::RemoveItemType(_) => "RemoveItemType",
        }
    }

    /// Human-readable account of what `execute` did.
    pub fn describe(&self) -> String {
        match self {
            CatalogCommand::AdjustStock(c) => {
                let item = match &c.item_name {
                    Some(name) => name.clone(),
                    None => c.item_id.to_string(),
                };
                if c.is_restock() {
                    format!("Restocked '{item}' by {}", c.qty)
                } else {
                    format!("Sold {} of '{item}'", c.qty)
                }
            }
            CatalogCommand::AddCategory(c) => format!(
                "Created Category '{}' under '{}'",
                c.name,
                c.parent_name.as_deref().unwrap_or("?")
            ),
            CatalogCommand::AddItem(c) => format!(
                "Created Product '{}' under '{}'",
                c.item_name,
                c.parent_name.as_deref().unwrap_or("?")
            ),
            CatalogCommand::AddItemType(c) => format!("Registered Product Type '{}'", c.type_name),
            CatalogCommand::RemoveNode(c) => format!("Removed {}", c.target_label()),
            CatalogCommand::RemoveItemType(c) => format!("Removed Product Type '{}'", c.type_name),
        }
    }

    pub fn execute(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        match self {
            CatalogCommand::AdjustStock(c) => c.execute(state),
            CatalogCommand::AddCategory(c) => c.execute(state),
            CatalogCommand::AddItem(c) => c.execute(state),
            CatalogCommand::AddItemType(c) => c.execute(state),
            CatalogCommand::RemoveNode(c) => c.execute(state),
            CatalogCommand::RemoveItemType(c) => c.execute(state),
        }
    }

    pub fn undo(&mut self, state: &mut CatalogState) -> DomainResult<Effect> {
        match self {
            CatalogCommand::AdjustStock(c) => c.undo(state),
            CatalogCommand::AddCategory(c) => c.undo(state),
            CatalogCommand::AddItem(c) => c.undo(state),
            CatalogCommand::AddItemType(c) => c.undo(state),
            CatalogCommand::RemoveNode(c) => c.undo(state),
            CatalogCommand::RemoveItemType(c) => c.undo(state),
        }
    }
}

impl From<AdjustStock> for CatalogCommand {
    fn from(value: AdjustStock) -> Self {
        CatalogCommand::AdjustStock(value)
    }
}

impl From<AddCategory> for CatalogCommand {
    fn from(value: AddCategory) -> Self {
        CatalogCommand::AddCategory(value)
    }
}

impl From<AddItem> for CatalogCommand {
    fn from(value: AddItem) -> Self {
        CatalogCommand::AddItem(value)
    }
}

impl From<AddItemType> for CatalogCommand {
    fn from(value: AddItemType) -> Self {
        CatalogCommand::AddItemType(value)
    }
}

impl From<RemoveNode> for CatalogCommand {
    fn from(value: RemoveNode) -> Self {
        CatalogCommand::RemoveNode(value)
    }
}

impl From<RemoveItemType> for CatalogCommand {
    fn from(value: RemoveItemType) -> Self {
        CatalogCommand::RemoveItemType(value)
    }
}
