use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use serde_json::Value;

use slate_core::{Slot, SlotBus};

use crate::config::CliConfig;

/// Execute the watch command
pub async fn execute(config: CliConfig, key: String, poll_ms: Option<u64>) -> Result<()> {
    let opened = super::open_store(&config);
    if !opened.is_durable() {
        println!(
            "{}",
            "Store is in memory mode; only this process's writes are visible.".yellow()
        );
    }

    let notifier = super::start_notifier(&opened, &config);
    let poll_every = poll_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.poll_interval());

    let bus = SlotBus::new(config.sync.bus_capacity);
    let mut builder = Slot::builder(key.clone(), Value::Null, Arc::new(opened), bus)
        .with_poll_interval(poll_every)
        .recover_with_initial();
    if let Some(notifier) = notifier {
        builder = builder.with_notifier(notifier);
    }
    let slot: Slot<Value> = builder.bind().await?;

    println!("{} {} (ctrl-c to stop)", "Watching".cyan().bold(), key);
    print_value(&key, &slot.get());

    let mut rx = slot.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let value = rx.borrow_and_update().clone();
                print_value(&key, &value);
            }
            _ = &mut ctrl_c => break,
        }
    }

    slot.close().await;

    Ok(())
}

fn print_value(key: &str, value: &Value) {
    let stamp = Local::now().format("%H:%M:%S%.3f");
    println!("{} {} = {}", stamp.to_string().dimmed(), key.cyan(), value);
}
