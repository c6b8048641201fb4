//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// lookups, stock rules). Storage failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, bad name characters).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced item, category, or item type does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A sale asked for more units than the item holds, or the item is out of stock.
    #[error("insufficient stock for '{item}': requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        requested: u32,
        available: u32,
    },

    /// Undo was requested with an empty command history.
    #[error("there is no command to undo")]
    EmptyHistory,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn insufficient_stock(item: impl Into<String>, requested: u32, available: u32) -> Self {
        Self::InsufficientStock {
            item: item.into(),
            requested,
            available,
        }
    }

    /// Whether a command failing with this error is still kept in the history.
    ///
    /// Blocked sales are recorded; every other failure leaves no trace.
    pub fn is_recorded_failure(&self) -> bool {
        matches!(self, Self::InsufficientStock { .. })
    }
}
