//! `add_item_to_order` — append a menu item to an existing order.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use carhop_core::errors::OrderError;
use carhop_core::ids::OrderId;
use carhop_core::ledger::OrderLedger;
use carhop_core::tools::{ToolDefinition, ToolResponse};

use crate::schema::ToolSchemaBuilder;
use crate::traits::{OrderTool, recover};
use crate::validation::{require_string, string_or_list};

/// Typed request parsed at the router boundary.
#[derive(Debug, PartialEq)]
struct AddItemRequest {
    order_id: OrderId,
    item_name: String,
    modifications: Vec<String>,
}

impl AddItemRequest {
    fn parse(params: &Value) -> Result<Self, OrderError> {
        Ok(Self {
            order_id: OrderId::from(require_string(params, "orderId", "ID of the order")?),
            item_name: require_string(params, "itemName", "name of the item to add")?,
            modifications: string_or_list(params, "modifications")?,
        })
    }
}

/// Adds one new line item per invocation — never merges with an existing
/// identical item. The agent is instructed to call this once per item the
/// customer actually asked for; the router never retries on its behalf.
pub struct AddItemTool {
    ledger: Arc<dyn OrderLedger>,
}

impl AddItemTool {
    /// Create the tool over the given ledger.
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl OrderTool for AddItemTool {
    fn name(&self) -> &str {
        "add_item_to_order"
    }

    fn definition(&self) -> ToolDefinition {
        ToolSchemaBuilder::new("add_item_to_order", "Adds an item to an existing order")
            .required_property(
                "orderId",
                json!({"type": "string", "description": "ID of the order"}),
            )
            .required_property(
                "itemName",
                json!({
                    "type": "string",
                    "description": "Name of the item to add. Capitalize the first letter of each word."
                }),
            )
            .property(
                "modifications",
                json!({
                    "type": "string",
                    "description": "If the customer requests a modification to the item, input it here. \
                                    Use one of NO, EX, or LITE, followed by the ingredient."
                }),
            )
            .build()
    }

    async fn invoke(&self, params: Value) -> ToolResponse {
        let request = match AddItemRequest::parse(&params) {
            Ok(request) => request,
            Err(err) => return recover(&err),
        };
        match self
            .ledger
            .add_item(&request.order_id, &request.item_name, &request.modifications)
            .await
        {
            Ok(line_item_id) => ToolResponse::ok(format!(
                "Added {}: {line_item_id} to order {}",
                request.item_name, request.order_id
            ))
            .with_field("lineItemId", line_item_id.as_str()),
            Err(err) => recover(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StubFailure, StubLedger};

    #[tokio::test]
    async fn adds_and_reports_the_line_item_id() {
        let ledger = Arc::new(StubLedger::default());
        let tool = AddItemTool::new(Arc::clone(&ledger) as Arc<dyn OrderLedger>);
        let response = tool
            .invoke(json!({"orderId": "ord_1", "itemName": "Burger"}))
            .await;
        assert!(response.success);
        assert_eq!(response.fields["lineItemId"], "burger_stub");
        assert_eq!(
            response.message.as_deref(),
            Some("Added Burger: burger_stub to order ord_1")
        );
    }

    #[tokio::test]
    async fn bare_string_modification_reaches_the_ledger_as_a_list() {
        let ledger = Arc::new(StubLedger::default());
        let tool = AddItemTool::new(Arc::clone(&ledger) as Arc<dyn OrderLedger>);
        let _ = tool
            .invoke(json!({"orderId": "ord_1", "itemName": "Burger", "modifications": "NO onions"}))
            .await;
        let calls = ledger.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1["modifications"], json!(["NO onions"]));
    }

    #[tokio::test]
    async fn missing_item_name_never_touches_the_ledger() {
        let ledger = Arc::new(StubLedger::default());
        let tool = AddItemTool::new(Arc::clone(&ledger) as Arc<dyn OrderLedger>);
        let response = tool.invoke(json!({"orderId": "ord_1"})).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("itemName"));
        assert!(ledger.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_menu_item_is_a_structured_failure() {
        let tool = AddItemTool::new(Arc::new(StubLedger::failing(StubFailure::MenuItemNotFound)));
        let response = tool
            .invoke(json!({"orderId": "ord_1", "itemName": "Pizza"}))
            .await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Menu item not found: Pizza"));
    }

    #[test]
    fn schema_requires_order_and_item_name_only() {
        let def = AddItemTool::new(Arc::new(StubLedger::default())).definition();
        assert_eq!(def.parameters.required.unwrap(), vec!["orderId", "itemName"]);
    }
}
