use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

use slate_core::StateStore;
use slate_tools::{ToolRegistry, UpdateCounterTool};

use crate::config::CliConfig;

/// Registry with the built-in tools registered over the given store.
pub fn builtin_registry(store: Arc<dyn StateStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(UpdateCounterTool::new(store)));
    registry
}

/// Execute the tools command: print registered tools and their schemas.
pub async fn list(config: CliConfig) -> Result<()> {
    let store: Arc<dyn StateStore> = Arc::new(super::open_store(&config));
    let registry = builtin_registry(store);

    for def in registry.definitions() {
        println!("{}", def.name.cyan().bold());
        println!("  {}", def.description);
        if let Some(parameters) = &def.parameters {
            println!("  {} {}", "parameters:".dimmed(), parameters);
        }
    }

    Ok(())
}

/// Execute the call command: invoke a registered tool by name.
pub async fn call(config: CliConfig, name: String, args: String) -> Result<()> {
    let store: Arc<dyn StateStore> = Arc::new(super::open_store(&config));
    let registry = builtin_registry(store);

    let arguments: Value = serde_json::from_str(&args)
        .with_context(|| format!("Tool arguments are not valid JSON: {}", args))?;

    let result = registry.invoke(&name, arguments).await?;
    println!("{}", result);

    Ok(())
}
