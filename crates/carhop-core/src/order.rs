//! Order, line item, and modification records.
//!
//! The wire shape mirrors the persisted document layout:
//!
//! ```json
//! {
//!   "id": "ord_…",
//!   "items": { "<lineItemId>": { "name", "price", "quantity", "modifications": { "<modId>": … } } },
//!   "totalPrice": 8.98,
//!   "timestamp": "2026-08-29T…Z"
//! }
//! ```
//!
//! INVARIANT: `total_price` equals the sum of each line item's snapshot
//! price × quantity after every successful mutation. The store enforces it
//! transactionally; [`Order::computed_total`] exists so tests (and debug
//! assertions) can check it from the outside.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{LineItemId, ModificationId, OrderId};
use crate::money::Price;

/// A free-text adjustment attached to a line item.
///
/// Only persisted when at least one field besides the timestamp carries
/// content — an all-empty modification request is a documented no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    /// The instruction text (e.g. `"NO onions"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    /// Free-form custom instructions, stored separately from the
    /// structured instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    /// When the modification was applied.
    pub timestamp: DateTime<Utc>,
}

impl Modification {
    /// Build a modification from optional raw inputs, trimming both fields
    /// and dropping empties. Returns `None` when nothing remains — the
    /// caller treats that as a successful no-op, not an error.
    pub fn from_parts(
        instruction: Option<&str>,
        custom_instructions: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        let instruction = instruction
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let custom_instructions = custom_instructions
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        if instruction.is_none() && custom_instructions.is_none() {
            return None;
        }
        Some(Self {
            instruction,
            custom_instructions,
            timestamp,
        })
    }
}

/// One ordered product instance within an order.
///
/// Name and price are snapshots taken from the catalog at add-time; later
/// catalog changes never touch them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    /// Display name snapshot.
    pub name: String,
    /// Price snapshot.
    pub price: Price,
    /// Always ≥ 1. Adds never merge into an existing line item, so in
    /// practice this is 1, but the total math honors it regardless.
    pub quantity: u32,
    /// Modifications in application order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub modifications: IndexMap<ModificationId, Modification>,
}

impl OrderLineItem {
    /// This line's contribution to the order total.
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A single customer transaction's record of line items and total price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Globally unique id, assigned at creation.
    pub id: OrderId,
    /// Line items keyed by id. Insertion order is not significant.
    #[serde(default)]
    pub items: BTreeMap<LineItemId, OrderLineItem>,
    /// Running total. See the module invariant.
    pub total_price: Price,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Order {
    /// An empty order with a zero total.
    pub fn empty(id: OrderId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            items: BTreeMap::new(),
            total_price: Price::ZERO,
            timestamp,
        }
    }

    /// Recompute the total from the line items. Must always equal
    /// [`Order::total_price`]; exposed for tests and consistency checks.
    pub fn computed_total(&self) -> Price {
        self.items.values().map(OrderLineItem::line_total).sum()
    }
}
