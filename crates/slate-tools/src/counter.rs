//! Built-in tool that writes a new counter value to the store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use slate_core::StateStore;

use crate::error::{ToolError, ToolResult};
use crate::handler::ToolHandler;
use crate::types::ToolDefinition;

/// Store key the counter tool writes to by default.
pub const COUNTER_KEY: &str = "counter";

/// Tool that sets the shared counter to a caller-provided value.
///
/// The tool writes straight to the store rather than through a bound slot.
/// Slots observing the key converge on the new value through change
/// notifications or their polling fallback, the same way they pick up writes
/// from other processes.
pub struct UpdateCounterTool {
    key: String,
    store: Arc<dyn StateStore>,
}

impl UpdateCounterTool {
    /// Create the tool writing to the default counter key.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            key: COUNTER_KEY.to_string(),
            store,
        }
    }

    /// Use a different store key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
}

#[async_trait]
impl ToolHandler for UpdateCounterTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("update_counter", "Update the counter to a new value")
            .with_parameters(json!({
                "type": "object",
                "properties": {
                    "count": {
                        "type": "integer",
                        "description": "The new counter value"
                    }
                },
                "required": ["count"]
            }))
            .with_returns(json!({
                "type": "object",
                "properties": {
                    "success": { "type": "boolean" }
                }
            }))
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let count = arguments
            .get("count")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                ToolError::InvalidArguments("count must be an integer".to_string())
            })?;

        let text = count.to_string();
        self.store.set(&self.key, &text)?;
        debug!(key = %self.key, count, "counter updated by tool");

        Ok(json!({ "success": true }))
    }
}
