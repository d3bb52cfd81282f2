//! Error taxonomy for ledger operations.
//!
//! Five classes, matching what the router boundary distinguishes:
//!
//! - [`OrderError::OrderNotFound`] — the order id resolves to nothing
//! - [`OrderError::MenuItemNotFound`] — no such item on the menu
//! - [`OrderError::LineItemNotFound`] — the line item is absent
//! - [`OrderError::Validation`] — missing/malformed caller arguments
//! - [`OrderError::Storage`] — the store itself is unavailable
//!
//! All but `Storage` are recovered at the router into a structured
//! `{success: false, error}` response and never cross that boundary as
//! panics. Storage failures are wrapped into the same shape but logged as
//! hard failures; retrying is the caller's decision, never ours.

use crate::ids::{LineItemId, OrderId};

/// Result alias used across the carhop crates.
pub type Result<T> = std::result::Result<T, OrderError>;

/// Everything that can go wrong applying an operation to the order ledger.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// No order exists with the given id.
    #[error("Order not found with ID: {0}")]
    OrderNotFound(OrderId),

    /// A menu item could not be resolved from the catalog.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// A line item is absent from the order (already removed or never added).
    #[error("Item not found in order: {0}")]
    LineItemNotFound(LineItemId),

    /// Caller arguments were missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The underlying document store failed.
    #[error("Storage unavailable: {0}")]
    Storage(String),
}

impl OrderError {
    /// Wrap any storage-layer failure. Keeps the foundation crate free of
    /// driver-specific error types.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// True for the infrastructure class that callers may want to retry
    /// the whole user intent for.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
