//! Read-only summaries of the catalog and its command history.

use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::node::Category;
use crate::stock::StockState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockEntry {
    pub name: String,
    pub quantity: u32,
    pub state: StockState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryReport {
    pub item_count: usize,
    pub category_count: usize,
    pub total_stock: u64,
    pub total_value: u64,
    pub low_stock: Vec<LowStockEntry>,
}

impl InventoryReport {
    pub fn from_root(root: &Category) -> Self {
        let low_stock = root
            .collect_low_stock()
            .into_iter()
            .map(|item| LowStockEntry {
                name: item.name().to_string(),
                quantity: item.quantity(),
                state: item.state(),
            })
            .collect();

        Self {
            item_count: root.items().len(),
            category_count: root.category_count(),
            total_stock: root.total_stock(),
            total_value: root.total_value(),
            low_stock,
        }
    }

    pub fn all_stocked(&self) -> bool {
        self.low_stock.is_empty()
    }
}

impl core::fmt::Display for InventoryReport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, ">> Overall Statistics:")?;
        writeln!(f, "   Total Categories: {}", self.category_count)?;
        writeln!(f, "   Total Products: {}", self.item_count)?;
        writeln!(f, "   Total Stock: {}", self.total_stock)?;
        writeln!(f, "   Total Value: ${}", self.total_value)?;
        writeln!(f, "   Low Stock Alerts: {}", self.low_stock.len())?;
        writeln!(f)?;

        if self.all_stocked() {
            return writeln!(f, ">> Status: All products are adequately stocked.");
        }
        writeln!(f, ">> ATTENTION REQUIRED: LOW STOCK ITEMS:")?;
        for entry in &self.low_stock {
            writeln!(
                f,
                "   - {:<20} - Stock: {:<3} ({})",
                entry.name, entry.quantity, entry.state
            )?;
        }
        Ok(())
    }
}

/// Executed command names, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryExport {
    pub generated_at: DateTime<Utc>,
    pub commands: Vec<String>,
}

impl HistoryExport {
    pub fn new(generated_at: DateTime<Utc>, commands: Vec<String>) -> Self {
        Self {
            generated_at,
            commands,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        write!(out, "{self}")?;
        out.flush()
    }
}

impl core::fmt::Display for HistoryExport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Generated: {}", self.generated_at.to_rfc3339())?;
        writeln!(f, "Total Commands Executed: {}", self.commands.len())?;
        if self.commands.is_empty() {
            return writeln!(f, "No commands executed yet.");
        }
        writeln!(f, "HISTORY (Newest first):")?;
        for (n, name) in self.commands.iter().enumerate() {
            writeln!(f, "{:<4} {name}", format!("[{}]", n + 1))?;
        }
        Ok(())
    }
}
