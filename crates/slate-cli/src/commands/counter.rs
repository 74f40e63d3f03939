use std::sync::Arc;

use anyhow::Result;

use slate_core::SlotBus;

use crate::cli::CounterCommands;
use crate::config::CliConfig;
use crate::counter::Counter;

/// Execute counter subcommands
pub async fn execute(config: CliConfig, cmd: CounterCommands) -> Result<()> {
    let opened = super::open_store(&config);
    let bus = SlotBus::new(config.sync.bus_capacity);
    let counter = Counter::bind(Arc::new(opened), bus, None, config.poll_interval()).await?;

    match cmd {
        CounterCommands::Show => println!("{}", counter.value()),
        CounterCommands::Inc { by } => println!("{}", counter.increment(by)?),
        CounterCommands::Dec { by } => println!("{}", counter.decrement(by)?),
        CounterCommands::Set { value } => {
            counter.set(value)?;
            println!("{}", value);
        }
        CounterCommands::Reset => {
            counter.reset()?;
            println!("0");
        }
    }

    counter.close().await;

    Ok(())
}
