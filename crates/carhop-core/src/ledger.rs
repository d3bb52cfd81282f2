//! The order-ledger seam.
//!
//! [`OrderLedger`] is the explicit store interface injected into every
//! tool at construction. Tools hold an `Arc<dyn OrderLedger>` — there is
//! no ambient client or process-wide singleton anywhere in the system.
//!
//! Every operation is atomic: it either fully applies or leaves the order
//! record untouched, and concurrent operations on the same order are
//! applied as serialized read-modify-writes (no lost updates on the
//! total).

use async_trait::async_trait;

use crate::errors::Result;
use crate::ids::{LineItemId, ModificationId, OrderId};
use crate::order::Order;

/// Authoritative owner of order state.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Create a new empty order with a zero total.
    ///
    /// Fails only on storage unavailability; that failure is fatal to the
    /// caller and is never retried internally.
    async fn create_order(&self) -> Result<OrderId>;

    /// Resolve `item_name` through the menu catalog (inside the same
    /// transaction) and append a new line item (quantity 1) to the order,
    /// snapshotting the catalog name and price. `modifications` are
    /// attached to the new line at creation.
    ///
    /// Always creates a new line item — identical adds are never merged.
    async fn add_item(
        &self,
        order_id: &OrderId,
        item_name: &str,
        modifications: &[String],
    ) -> Result<LineItemId>;

    /// Delete a line item, decrementing the total by its snapshot price.
    async fn remove_item(&self, order_id: &OrderId, line_item_id: &LineItemId) -> Result<()>;

    /// Attach a modification to a line item. Never changes the total —
    /// modifications are not re-priced.
    ///
    /// Returns `Ok(None)` when both fields are empty after trimming: a
    /// successful no-op, not an error.
    async fn modify_item(
        &self,
        order_id: &OrderId,
        line_item_id: &LineItemId,
        modification: Option<&str>,
        custom_instructions: Option<&str>,
    ) -> Result<Option<ModificationId>>;

    /// Fetch the current order snapshot.
    async fn get_order(&self, order_id: &OrderId) -> Result<Order>;
}
