//! `remove_item_from_order` — delete a line item from an order.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use carhop_core::errors::OrderError;
use carhop_core::ids::{LineItemId, OrderId};
use carhop_core::ledger::OrderLedger;
use carhop_core::tools::{ToolDefinition, ToolResponse};

use crate::schema::ToolSchemaBuilder;
use crate::traits::{OrderTool, recover};
use crate::validation::require_string;

/// Typed request parsed at the router boundary.
#[derive(Debug, PartialEq)]
struct RemoveItemRequest {
    order_id: OrderId,
    line_item_id: LineItemId,
}

impl RemoveItemRequest {
    fn parse(params: &Value) -> Result<Self, OrderError> {
        Ok(Self {
            order_id: OrderId::from(require_string(params, "orderId", "ID of the order")?),
            line_item_id: LineItemId::from(require_string(
                params,
                "itemId",
                "ID of the item to remove",
            )?),
        })
    }
}

/// Removes a line item; the total drops by that line's snapshot price.
pub struct RemoveItemTool {
    ledger: Arc<dyn OrderLedger>,
}

impl RemoveItemTool {
    /// Create the tool over the given ledger.
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl OrderTool for RemoveItemTool {
    fn name(&self) -> &str {
        "remove_item_from_order"
    }

    fn definition(&self) -> ToolDefinition {
        ToolSchemaBuilder::new(
            "remove_item_from_order",
            "Removes an item from an existing order",
        )
        .required_property(
            "orderId",
            json!({"type": "string", "description": "ID of the order"}),
        )
        .required_property(
            "itemId",
            json!({"type": "string", "description": "ID of the item to remove"}),
        )
        .build()
    }

    async fn invoke(&self, params: Value) -> ToolResponse {
        let request = match RemoveItemRequest::parse(&params) {
            Ok(request) => request,
            Err(err) => return recover(&err),
        };
        match self
            .ledger
            .remove_item(&request.order_id, &request.line_item_id)
            .await
        {
            Ok(()) => ToolResponse::ok(format!(
                "Removed {} from order {}",
                request.line_item_id, request.order_id
            )),
            Err(err) => recover(&err),
        }
    }
}
