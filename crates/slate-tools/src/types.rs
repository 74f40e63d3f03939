//! Shared types describing tools to callers and model backends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of a tool that can be invoked through the registry.
///
/// The `parameters` and `returns` schemas are JSON Schema fragments. They are
/// what a model backend sees when deciding whether and how to call the tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool.
    pub name: String,

    /// Human-readable description of what the tool does.
    pub description: String,

    /// JSON Schema for the tool's arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    /// JSON Schema for the tool's return value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<Value>,
}

impl ToolDefinition {
    /// Create a new tool definition with no schemas attached.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
            returns: None,
        }
    }

    /// Attach a parameter schema.
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Attach a return value schema.
    pub fn with_returns(mut self, returns: Value) -> Self {
        self.returns = Some(returns);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_builder() {
        let def = ToolDefinition::new("update_counter", "Update the counter")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "count": { "type": "integer" }
                },
                "required": ["count"]
            }))
            .with_returns(json!({
                "type": "object",
                "properties": {
                    "success": { "type": "boolean" }
                }
            }));

        assert_eq!(def.name, "update_counter");
        assert!(def.parameters.is_some());
        assert!(def.returns.is_some());
    }

    #[test]
    fn test_definition_serialization_skips_missing_schemas() {
        let def = ToolDefinition::new("noop", "Does nothing");
        let json = serde_json::to_value(&def).unwrap();

        assert_eq!(json["name"], "noop");
        assert!(json.get("parameters").is_none());
        assert!(json.get("returns").is_none());
    }
}
