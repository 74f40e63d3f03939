use anyhow::Result;
use colored::Colorize;

use slate_core::StateStore;

use crate::config::CliConfig;

/// Execute the remove command
pub async fn execute(config: CliConfig, key: String) -> Result<()> {
    let store = super::open_store(&config);
    store.remove(&key)?;

    println!("{} {}", "Removed".green().bold(), key.cyan());

    Ok(())
}
