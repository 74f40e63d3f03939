//! The trait implemented by every invocable tool.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolResult;
use crate::types::ToolDefinition;

/// A tool that can be registered and invoked by name.
///
/// Implementations receive their arguments as untyped JSON and are expected
/// to validate them against their own parameter schema.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The definition advertised to callers and model backends.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with the given arguments.
    async fn call(&self, arguments: Value) -> ToolResult<Value>;
}
