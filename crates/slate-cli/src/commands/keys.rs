use anyhow::Result;
use colored::Colorize;

use slate_core::StateStore;

use crate::config::CliConfig;

/// Execute the keys command
pub async fn execute(config: CliConfig) -> Result<()> {
    let store = super::open_store(&config);
    let keys = store.keys()?;

    if keys.is_empty() {
        println!("{}", "(no entries)".dimmed());
        return Ok(());
    }

    for key in keys {
        println!("{}", key);
    }

    Ok(())
}
