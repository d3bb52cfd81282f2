//! `modify_item_in_order` — attach a modification to an existing line
//! item.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use carhop_core::errors::OrderError;
use carhop_core::ids::{LineItemId, OrderId};
use carhop_core::ledger::OrderLedger;
use carhop_core::tools::{ToolDefinition, ToolResponse};

use crate::schema::ToolSchemaBuilder;
use crate::traits::{OrderTool, recover};
use crate::validation::{optional_string, require_string};

/// Typed request parsed at the router boundary.
///
/// Both text fields are optional: a request with neither is answered as a
/// successful no-op, matching the ledger contract.
#[derive(Debug, PartialEq)]
struct ModifyItemRequest {
    order_id: OrderId,
    line_item_id: LineItemId,
    modifications: Option<String>,
    custom_instructions: Option<String>,
}

impl ModifyItemRequest {
    fn parse(params: &Value) -> Result<Self, OrderError> {
        Ok(Self {
            order_id: OrderId::from(require_string(params, "orderId", "ID of the order")?),
            line_item_id: LineItemId::from(require_string(
                params,
                "itemId",
                "ID of the item to modify",
            )?),
            modifications: optional_string(params, "modifications"),
            custom_instructions: optional_string(params, "customInstructions"),
        })
    }
}

/// Attaches a modification to a line item. Modifications are free — the
/// order total never changes here.
pub struct ModifyItemTool {
    ledger: Arc<dyn OrderLedger>,
}

impl ModifyItemTool {
    /// Create the tool over the given ledger.
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl OrderTool for ModifyItemTool {
    fn name(&self) -> &str {
        "modify_item_in_order"
    }

    fn definition(&self) -> ToolDefinition {
        ToolSchemaBuilder::new(
            "modify_item_in_order",
            "Applies a modification to an item already in the order",
        )
        .required_property(
            "orderId",
            json!({"type": "string", "description": "ID of the order"}),
        )
        .required_property(
            "itemId",
            json!({
                "type": "string",
                "description": "Unique identifier of the line item to modify"
            }),
        )
        .property(
            "modifications",
            json!({
                "type": "string",
                "description": "Ingredient to modify and the modifier. Use one of NO, LITE, or EX \
                                (e.g. EX ketchup)."
            }),
        )
        .property(
            "customInstructions",
            json!({
                "type": "string",
                "description": "Free-form instructions that don't fit the NO/LITE/EX form"
            }),
        )
        .build()
    }

    async fn invoke(&self, params: Value) -> ToolResponse {
        let request = match ModifyItemRequest::parse(&params) {
            Ok(request) => request,
            Err(err) => return recover(&err),
        };
        match self
            .ledger
            .modify_item(
                &request.order_id,
                &request.line_item_id,
                request.modifications.as_deref(),
                request.custom_instructions.as_deref(),
            )
            .await
        {
            Ok(Some(modification_id)) => ToolResponse::ok(format!(
                "Modified item {} in order {}",
                request.line_item_id, request.order_id
            ))
            .with_field("modificationId", modification_id.as_str()),
            Ok(None) => ToolResponse::ok(format!(
                "No modifications to apply for item {} in order {}",
                request.line_item_id, request.order_id
            )),
            Err(err) => recover(&err),
        }
    }
}
