use anyhow::Result;
use colored::Colorize;

use slate_core::StateStore;

use crate::config::CliConfig;

/// Execute the get command
pub async fn execute(config: CliConfig, key: String) -> Result<()> {
    let store = super::open_store(&config);

    match store.get(&key)? {
        Some(text) => println!("{}", text),
        None => println!("{}", "(not set)".dimmed()),
    }

    Ok(())
}
