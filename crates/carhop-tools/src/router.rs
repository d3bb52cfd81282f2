//! Tool invocation router.
//!
//! Dispatch pipeline: look up the tool by name → invoke (the tool itself
//! validates arguments and recovers ledger errors) → record metrics and an
//! audit entry → hand the structured response back to the driver.
//!
//! The router is deliberately dumb about delivery semantics. The driver is
//! known to report a spurious "tool not available" error to the user right
//! after dispatch even though the call completes asynchronously, so the
//! router never treats a missing acknowledgment as failure and never
//! auto-retries — a retried add would put the item in the order twice.
//! Retry policy belongs entirely to the driving agent.

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use metrics::{counter, histogram};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use carhop_core::errors::OrderError;
use carhop_core::ledger::OrderLedger;
use carhop_core::tools::{ToolDefinition, ToolResponse};

use crate::audit::{AuditEntry, AuditLog};
use crate::ordering;
use crate::traits::{OrderTool, recover};

/// Maps named tool calls onto ledger operations and audits every one.
pub struct ToolRouter {
    tools: IndexMap<String, Arc<dyn OrderTool>>,
    audit: AuditLog,
}

impl ToolRouter {
    /// A router with the five ordering tools over the given ledger.
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self::with_tools(ordering::default_tools(ledger))
    }

    /// A router over an explicit tool set.
    pub fn with_tools(tools: Vec<Arc<dyn OrderTool>>) -> Self {
        let tools = tools
            .into_iter()
            .map(|tool| (tool.name().to_owned(), tool))
            .collect();
        Self {
            tools,
            audit: AuditLog::new(),
        }
    }

    /// Definitions to register with the conversational driver, in
    /// registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// The append-only audit log (read by the display layer).
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Dispatch one tool call.
    ///
    /// Always resolves to the uniform `{success, …, error}` shape — an
    /// unknown tool name or bad arguments are caller errors answered here,
    /// not ledger failures. Every invocation is audited, whatever the
    /// outcome.
    #[instrument(skip(self, params))]
    pub async fn dispatch(&self, tool_name: &str, params: Value) -> ToolResponse {
        let start = Instant::now();
        let response = match self.tools.get(tool_name) {
            Some(tool) => tool.invoke(params.clone()).await,
            None => {
                warn!(tool_name, "unknown tool invoked");
                recover(&OrderError::Validation(format!("unknown tool: {tool_name}")))
            }
        };

        let outcome = if response.success { "success" } else { "error" };
        counter!(
            "carhop_tool_invocations_total",
            "tool" => tool_name.to_owned(),
            "outcome" => outcome,
        )
        .increment(1);
        histogram!("carhop_tool_duration_seconds", "tool" => tool_name.to_owned())
            .record(start.elapsed().as_secs_f64());
        debug!(tool_name, outcome, "tool dispatched");

        self.audit.record(AuditEntry {
            tool_name: tool_name.to_owned(),
            input: params,
            output: response.to_value(),
        });
        response
    }
}
