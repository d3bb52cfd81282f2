//! Tool definitions and the uniform response shape.
//!
//! A [`ToolDefinition`] is what the conversational driver registers: a
//! name, a description, and a JSON-Schema object describing the
//! arguments. A [`ToolResponse`] is what every invocation answers with —
//! `{success: bool, …operation fields, error?}` — regardless of outcome.
//! Errors are surfaced inside the shape, never thrown past the router.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named, schema-declared action invocable by the conversational agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name as the driver invokes it (e.g. `add_item_to_order`).
    pub name: String,
    /// Natural-language description shown to the agent.
    pub description: String,
    /// JSON-Schema for the argument object.
    pub parameters: ToolParameterSchema,
}

/// JSON-Schema fragment for a tool's argument object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolParameterSchema {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property name → schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Names of required properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// The uniform `{success, …, error}` envelope every tool answers with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the operation applied.
    pub success: bool,
    /// Human-readable outcome, present on most successes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error text, present exactly when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Operation-specific fields (`orderId`, `lineItemId`, `order`, …).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ToolResponse {
    /// A successful response with a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            fields: Map::new(),
        }
    }

    /// A failed response carrying the error text.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            fields: Map::new(),
        }
    }

    /// Attach an operation-specific field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.fields.insert(name.into(), value.into());
        self
    }

    /// The response as a JSON value (what the driver receives).
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({"success": false, "error": "response serialization failed"})
        })
    }
}
