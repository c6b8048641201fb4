use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, NodeId};

use crate::stock::StockState;

/// Concrete kind of a stocked good.
///
/// Kinds differ only by one extra attribute carried alongside the shared item record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemKind {
    Electronic { warranty_months: u32 },
    Apparel { size: String },
    Generic,
}

impl ItemKind {
    /// Stable type tag (used by persistence and factory lookup).
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::Electronic { .. } => "electronic",
            ItemKind::Apparel { .. } => "apparel",
            ItemKind::Generic => "generic",
        }
    }

    /// Kind payload in its string form, if the kind carries one.
    pub fn detail(&self) -> Option<String> {
        match self {
            ItemKind::Electronic { warranty_months } => Some(warranty_months.to_string()),
            ItemKind::Apparel { size } => Some(size.clone()),
            ItemKind::Generic => None,
        }
    }
}

/// Shared attributes used to construct any item kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub name: String,
    /// Price in smallest currency unit.
    pub unit_price: u64,
    pub quantity: u32,
    pub reorder_threshold: u32,
}

impl ItemSpec {
    pub fn new(
        name: impl Into<String>,
        unit_price: u64,
        quantity: u32,
        reorder_threshold: u32,
    ) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            reorder_threshold,
        }
    }
}

/// Outcome of a quantity or threshold mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub before: StockState,
    pub after: StockState,
    pub quantity: u32,
}

impl StockChange {
    pub fn state_changed(&self) -> bool {
        self.before != self.after
    }
}

/// Check a node name against the characters the flat record format cannot carry.
///
/// Returns the trimmed name.
pub fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if trimmed.contains([',', '\n', '\r']) {
        return Err(DomainError::validation(format!(
            "name '{trimmed}' contains a forbidden character (',' or line break)"
        )));
    }
    if trimmed.eq_ignore_ascii_case("null") {
        return Err(DomainError::validation("'null' is a reserved name"));
    }
    Ok(trimmed.to_string())
}

/// A stocked good: price, quantity, reorder threshold and its derived stock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: NodeId,
    name: String,
    unit_price: u64,
    quantity: u32,
    reorder_threshold: u32,
    state: StockState,
    kind: ItemKind,
}

impl Item {
    pub fn new(spec: ItemSpec, kind: ItemKind) -> DomainResult<Self> {
        let name = validate_name(&spec.name)?;
        Ok(Self {
            id: NodeId::new(),
            name,
            unit_price: spec.unit_price,
            quantity: spec.quantity,
            reorder_threshold: spec.reorder_threshold,
            state: StockState::derive(spec.quantity, spec.reorder_threshold),
            kind,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn reorder_threshold(&self) -> u32 {
        self.reorder_threshold
    }

    pub fn state(&self) -> StockState {
        self.state
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Stock value: `unit_price * quantity`.
    pub fn value(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }

    /// Sell `qty` units.
    ///
    /// Fails without mutating when the item is out of stock or holds fewer than `qty` units.
    pub fn sell(&mut self, qty: u32) -> DomainResult<StockChange> {
        if self.state == StockState::OutOfStock || qty > self.quantity {
            return Err(DomainError::insufficient_stock(&self.name, qty, self.quantity));
        }
        let before = self.state;
        self.quantity -= qty;
        Ok(self.reconcile(before))
    }

    /// Add `qty` units, from any state including `OutOfStock`.
    ///
    /// Fails without mutating when the new quantity would not fit in a `u32`.
    pub fn restock(&mut self, qty: u32) -> DomainResult<StockChange> {
        let quantity = self.quantity.checked_add(qty).ok_or_else(|| {
            DomainError::validation(format!(
                "restocking '{}' by {qty} exceeds the maximum quantity of {}",
                self.name,
                u32::MAX
            ))
        })?;
        let before = self.state;
        self.quantity = quantity;
        Ok(self.reconcile(before))
    }

    /// Remove `qty` units without the sale guard (reversal of a restock).
    ///
    /// Clamps at zero: the quantity is never negative.
    pub fn deduct(&mut self, qty: u32) -> StockChange {
        let before = self.state;
        self.quantity = self.quantity.saturating_sub(qty);
        self.reconcile(before)
    }

    pub fn set_threshold(&mut self, threshold: u32) -> StockChange {
        let before = self.state;
        self.reorder_threshold = threshold;
        self.reconcile(before)
    }

    /// Price edits do not affect the stock state.
    pub fn set_price(&mut self, unit_price: u64) {
        self.unit_price = unit_price;
    }

    fn reconcile(&mut self, before: StockState) -> StockChange {
        self.state = StockState::derive(self.quantity, self.reorder_threshold);
        StockChange {
            before,
            after: self.state,
            quantity: self.quantity,
        }
    }
}
