//! Builder for tool JSON Schema definitions.
//!
//! Keeps each tool's `definition()` down to a readable chain instead of
//! hand-assembled `Map` plumbing.

use serde_json::Value;

use carhop_core::tools::{ToolDefinition, ToolParameterSchema};

/// Fluent builder for [`ToolDefinition`] schemas.
///
/// ```ignore
/// ToolSchemaBuilder::new("remove_item_from_order", "Removes an item from an existing order")
///     .required_property("orderId", json!({"type": "string", "description": "ID of the order"}))
///     .build()
/// ```
pub struct ToolSchemaBuilder {
    name: String,
    description: String,
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
}

impl ToolSchemaBuilder {
    /// Create a new builder with the given tool name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional property.
    pub fn property(mut self, name: &str, schema: Value) -> Self {
        let _ = self.properties.insert(name.into(), schema);
        self
    }

    /// Add a required property.
    pub fn required_property(mut self, name: &str, schema: Value) -> Self {
        let _ = self.properties.insert(name.into(), schema);
        self.required.push(name.into());
        self
    }

    /// Build the final [`ToolDefinition`].
    pub fn build(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description,
            parameters: ToolParameterSchema {
                schema_type: "object".into(),
                properties: Some(self.properties),
                required: if self.required.is_empty() {
                    None
                } else {
                    Some(self.required)
                },
            },
        }
    }
}
