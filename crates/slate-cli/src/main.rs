use anyhow::Result;
use clap::Parser;
use tracing::debug;

use slate_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = cli
        .log_level
        .map(|level| level.as_str())
        .unwrap_or(if cli.verbose { "debug" } else { "warn" });
    let env_filter = format!(
        "slate_cli={level},slate_core={level},slate_store={level},slate_watch={level},slate_tools={level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    // Load configuration with CLI overrides
    let config = config::CliConfig::load(cli.config, cli.store_dir)?;
    debug!(store_root = %config.store_root().display(), "configuration loaded");

    // Execute command (default to listing keys if no command provided)
    match cli.command {
        Some(Commands::Get { key }) => commands::get::execute(config, key).await?,

        Some(Commands::Set { key, value }) => commands::set::execute(config, key, value).await?,

        Some(Commands::Remove { key }) => commands::remove::execute(config, key).await?,

        Some(Commands::Keys) => commands::keys::execute(config).await?,

        Some(Commands::Watch { key, poll_ms }) => {
            commands::watch::execute(config, key, poll_ms).await?
        }

        Some(Commands::Counter(cmd)) => commands::counter::execute(config, cmd).await?,

        Some(Commands::Tools) => commands::tools::list(config).await?,

        Some(Commands::Call { name, args }) => commands::tools::call(config, name, args).await?,

        Some(Commands::Config(cmd)) => commands::config::execute(cmd).await?,

        None => commands::keys::execute(config).await?,
    }

    Ok(())
}
