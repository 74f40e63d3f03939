use anyhow::Result;
use colored::Colorize;
use serde_json::Value;

use slate_core::StateStore;

use crate::config::CliConfig;

/// Execute the set command
pub async fn execute(config: CliConfig, key: String, value: String) -> Result<()> {
    // Input that is not valid JSON is stored as a plain string.
    let value: Value = serde_json::from_str(&value).unwrap_or_else(|_| Value::String(value));
    let text = value.to_string();

    let store = super::open_store(&config);
    store.set(&key, &text)?;

    println!("{} {} = {}", "Stored".green().bold(), key.cyan(), text);

    Ok(())
}
