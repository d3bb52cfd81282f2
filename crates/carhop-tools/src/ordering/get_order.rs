//! `get_order_details` — read the current order snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use carhop_core::ids::OrderId;
use carhop_core::ledger::OrderLedger;
use carhop_core::tools::{ToolDefinition, ToolResponse};

use crate::schema::ToolSchemaBuilder;
use crate::traits::{OrderTool, recover};
use crate::validation::require_string;

/// Returns the full order snapshot so the agent can read the order back
/// to the customer.
pub struct GetOrderTool {
    ledger: Arc<dyn OrderLedger>,
}

impl GetOrderTool {
    /// Create the tool over the given ledger.
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl OrderTool for GetOrderTool {
    fn name(&self) -> &str {
        "get_order_details"
    }

    fn definition(&self) -> ToolDefinition {
        ToolSchemaBuilder::new(
            "get_order_details",
            "Get the details of the items in the current order",
        )
        .required_property(
            "orderId",
            json!({"type": "string", "description": "ID of the order"}),
        )
        .build()
    }

    async fn invoke(&self, params: Value) -> ToolResponse {
        let order_id = match require_string(&params, "orderId", "ID of the order") {
            Ok(raw) => OrderId::from(raw),
            Err(err) => return recover(&err),
        };
        match self.ledger.get_order(&order_id).await {
            Ok(order) => match serde_json::to_value(&order) {
                Ok(snapshot) => ToolResponse::ok(format!("Order {order_id}"))
                    .with_field("order", snapshot),
                Err(e) => ToolResponse::err(format!("Failed to serialize order: {e}")),
            },
            Err(err) => recover(&err),
        }
    }
}
