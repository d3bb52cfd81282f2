//! `create_order` — start a new order for the conversation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use carhop_core::ledger::OrderLedger;
use carhop_core::tools::{ToolDefinition, ToolResponse};

use crate::schema::ToolSchemaBuilder;
use crate::traits::{OrderTool, recover};

/// Creates a new empty order. Takes no arguments; the agent calls it once
/// at the start of the conversation.
pub struct CreateOrderTool {
    ledger: Arc<dyn OrderLedger>,
}

impl CreateOrderTool {
    /// Create the tool over the given ledger.
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl OrderTool for CreateOrderTool {
    fn name(&self) -> &str {
        "create_order"
    }

    fn definition(&self) -> ToolDefinition {
        ToolSchemaBuilder::new("create_order", "Creates a new order for the customer").build()
    }

    async fn invoke(&self, _params: Value) -> ToolResponse {
        match self.ledger.create_order().await {
            Ok(order_id) => ToolResponse::ok(format!("Created new order with ID: {order_id}"))
                .with_field("orderId", order_id.as_str()),
            Err(err) => recover(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StubFailure, StubLedger};
    use serde_json::json;

    #[tokio::test]
    async fn returns_the_new_order_id() {
        let tool = CreateOrderTool::new(Arc::new(StubLedger::default()));
        let response = tool.invoke(json!({})).await;
        assert!(response.success);
        assert_eq!(response.fields["orderId"], "ord_stub");
        assert_eq!(
            response.message.as_deref(),
            Some("Created new order with ID: ord_stub")
        );
    }

    #[tokio::test]
    async fn storage_failure_is_recovered_into_the_shape() {
        let tool = CreateOrderTool::new(Arc::new(StubLedger::failing(StubFailure::Storage)));
        let response = tool.invoke(json!({})).await;
        assert!(!response.success);
        assert!(response.error.unwrap().starts_with("Storage unavailable"));
    }

    #[test]
    fn declares_no_parameters() {
        let def = CreateOrderTool::new(Arc::new(StubLedger::default())).definition();
        assert!(def.parameters.properties.unwrap().is_empty());
        assert!(def.parameters.required.is_none());
    }
}
