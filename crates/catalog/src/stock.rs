//! Stock-level classification of an item.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an item's stock level.
///
/// The state is never tracked independently: it is always the result of
/// [`StockState::derive`] over the item's current quantity and reorder threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockState {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockState {
    /// Classify a stock level.
    ///
    /// - `quantity == 0` → `OutOfStock`
    /// - `0 < quantity <= threshold` → `LowStock` (the threshold itself is low)
    /// - `quantity > threshold` → `InStock`
    pub fn derive(quantity: u32, threshold: u32) -> Self {
        if quantity == 0 {
            StockState::OutOfStock
        } else if quantity <= threshold {
            StockState::LowStock
        } else {
            StockState::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockState::InStock => "InStock",
            StockState::LowStock => "LowStock",
            StockState::OutOfStock => "OutOfStock",
        }
    }

    /// Low-stock alerts cover both `LowStock` and `OutOfStock`.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, StockState::InStock)
    }
}

impl core::fmt::Display for StockState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
