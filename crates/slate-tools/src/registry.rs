//! Registry mapping tool names to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ToolError, ToolResult};
use crate::handler::ToolHandler;
use crate::types::ToolDefinition;

/// Holds all registered tools and dispatches invocations to them.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool handler under the name from its definition.
    ///
    /// Registering a second handler with the same name replaces the first.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.definition().name;
        if self.tools.contains_key(&name) {
            warn!(tool = %name, "replacing previously registered tool");
        }
        debug!(tool = %name, "registered tool");
        self.tools.insert(name, handler);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.tools.get(name).cloned()
    }

    /// Definitions of all registered tools, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> =
            self.tools.values().map(|tool| tool.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry has no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a registered tool by name.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        let handler = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!(tool = %name, "invoking tool");
        let result = handler.call(arguments).await;
        if let Err(ref err) = result {
            warn!(tool = %name, error = %err, "tool invocation failed");
        }
        result
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Returns its arguments unchanged")
        }

        async fn call(&self, arguments: Value) -> ToolResult<Value> {
            Ok(arguments)
        }
    }

    struct FailingTool;

    #[async_trait]
    impl ToolHandler for FailingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("broken", "Always fails")
        }

        async fn call(&self, _arguments: Value) -> ToolResult<Value> {
            Err(ToolError::Failed("nothing works".to_string()))
        }
    }

    #[tokio::test]
    async fn test_register_and_invoke() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        assert_eq!(registry.len(), 1);
        let result = registry.invoke("echo", json!({"hello": 1})).await.unwrap();
        assert_eq!(result, json!({"hello": 1}));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("missing", Value::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_handler_errors_pass_through() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingTool));

        let err = registry.invoke("broken", Value::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::Failed(_)));
    }

    #[test]
    fn test_definitions_are_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FailingTool));
        registry.register(Arc::new(EchoTool));

        let names: Vec<String> = registry
            .definitions()
            .into_iter()
            .map(|def| def.name)
            .collect();
        assert_eq!(names, vec!["broken", "echo"]);
    }
}
