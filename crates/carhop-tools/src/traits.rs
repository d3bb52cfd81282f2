//! The tool trait and error-to-response recovery.

use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use carhop_core::errors::OrderError;
use carhop_core::tools::{ToolDefinition, ToolResponse};

/// One named action the conversational agent can invoke.
///
/// Implementations hold an `Arc<dyn OrderLedger>` injected at
/// construction; nothing in this crate reaches for ambient state.
#[async_trait]
pub trait OrderTool: Send + Sync {
    /// Tool name as the driver invokes it.
    fn name(&self) -> &str;

    /// Argument schema registered with the driver.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool. Infallible at the signature level: every failure is
    /// folded into the `{success: false, error}` response shape.
    async fn invoke(&self, params: Value) -> ToolResponse;
}

/// Fold a ledger error into the structured response shape.
///
/// Not-found and validation failures are ordinary outcomes the agent can
/// speak to the customer about. Storage failures get the same shape but
/// are logged as hard failures — the caller may need to retry the whole
/// user intent, and that decision is theirs.
pub fn recover(err: &OrderError) -> ToolResponse {
    if err.is_storage() {
        error!(error = %err, "ledger operation failed on storage");
    }
    ToolResponse::err(err.to_string())
}
