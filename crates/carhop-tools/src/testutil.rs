//! Shared test doubles for tool unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use carhop_core::errors::{OrderError, Result};
use carhop_core::ids::{LineItemId, ModificationId, OrderId};
use carhop_core::ledger::OrderLedger;
use carhop_core::money::Price;
use carhop_core::order::{Order, OrderLineItem};

/// Failure a [`StubLedger`] can be armed with.
#[derive(Clone, Copy, Debug)]
pub(crate) enum StubFailure {
    OrderNotFound,
    LineItemNotFound,
    MenuItemNotFound,
    Storage,
}

/// A canned ledger that records calls and optionally fails every
/// operation with one configured error.
#[derive(Default)]
pub(crate) struct StubLedger {
    pub failure: Option<StubFailure>,
    pub calls: Mutex<Vec<(&'static str, Value)>>,
}

impl StubLedger {
    pub fn failing(failure: StubFailure) -> Self {
        Self {
            failure: Some(failure),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_calls(&self) -> Vec<(&'static str, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn note(&self, op: &'static str, args: Value) {
        self.calls.lock().unwrap().push((op, args));
    }

    fn fail(&self) -> Option<OrderError> {
        self.failure.map(|f| match f {
            StubFailure::OrderNotFound => OrderError::OrderNotFound(OrderId::from("ord_stub")),
            StubFailure::LineItemNotFound => {
                OrderError::LineItemNotFound(LineItemId::from("burger_stub"))
            }
            StubFailure::MenuItemNotFound => OrderError::MenuItemNotFound("Pizza".into()),
            StubFailure::Storage => OrderError::storage("stub storage down"),
        })
    }
}

#[async_trait]
impl OrderLedger for StubLedger {
    async fn create_order(&self) -> Result<OrderId> {
        self.note("create_order", json!({}));
        if let Some(err) = self.fail() {
            return Err(err);
        }
        Ok(OrderId::from("ord_stub"))
    }

    async fn add_item(
        &self,
        order_id: &OrderId,
        item_name: &str,
        modifications: &[String],
    ) -> Result<LineItemId> {
        self.note(
            "add_item",
            json!({"orderId": order_id, "itemName": item_name, "modifications": modifications}),
        );
        if let Some(err) = self.fail() {
            return Err(err);
        }
        Ok(LineItemId::from("burger_stub"))
    }

    async fn remove_item(&self, order_id: &OrderId, line_item_id: &LineItemId) -> Result<()> {
        self.note(
            "remove_item",
            json!({"orderId": order_id, "itemId": line_item_id}),
        );
        if let Some(err) = self.fail() {
            return Err(err);
        }
        Ok(())
    }

    async fn modify_item(
        &self,
        order_id: &OrderId,
        line_item_id: &LineItemId,
        modification: Option<&str>,
        custom_instructions: Option<&str>,
    ) -> Result<Option<ModificationId>> {
        self.note(
            "modify_item",
            json!({
                "orderId": order_id,
                "itemId": line_item_id,
                "modifications": modification,
                "customInstructions": custom_instructions,
            }),
        );
        if let Some(err) = self.fail() {
            return Err(err);
        }
        if modification.is_none() && custom_instructions.is_none() {
            return Ok(None);
        }
        Ok(Some(ModificationId::from("mod_stub")))
    }

    async fn get_order(&self, order_id: &OrderId) -> Result<Order> {
        self.note("get_order", json!({"orderId": order_id}));
        if let Some(err) = self.fail() {
            return Err(err);
        }
        let mut order = Order::empty(order_id.clone(), Utc::now());
        let _ = order.items.insert(
            LineItemId::from("burger_stub"),
            OrderLineItem {
                name: "Burger".into(),
                price: Price::from_cents(699),
                quantity: 1,
                modifications: indexmap::IndexMap::new(),
            },
        );
        order.total_price = Price::from_cents(699);
        Ok(order)
    }
}
