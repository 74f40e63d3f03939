//! CLI configuration loaded from file, environment, and flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use slate_core::{DEFAULT_BUS_CAPACITY, DEFAULT_POLL_INTERVAL};
use slate_store::FileStore;
use slate_watch::DEFAULT_DEBOUNCE;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Synchronization tuning
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Directory holding the durable entries
    pub root: Option<PathBuf>,
}

/// Synchronization tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Polling fallback interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// File watcher debounce window in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Broadcast capacity for same-process updates
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            debounce_ms: default_debounce_ms(),
            bus_capacity: default_bus_capacity(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_bus_capacity() -> usize {
    DEFAULT_BUS_CAPACITY
}

impl CliConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(config_file: Option<PathBuf>, store_dir: Option<PathBuf>) -> Result<Self> {
        // Start with defaults from config file (if exists)
        let mut config = Self::from_file_or_default(config_file)?;

        // Override with env vars
        if let Ok(root) = std::env::var("SLATE_STORE_DIR") {
            config.store.root = Some(PathBuf::from(root));
        }
        if let Ok(ms) = std::env::var("SLATE_POLL_INTERVAL_MS") {
            if let Ok(ms) = ms.parse() {
                config.sync.poll_interval_ms = ms;
            }
        }
        if let Ok(ms) = std::env::var("SLATE_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse() {
                config.sync.debounce_ms = ms;
            }
        }

        // Override with CLI args (highest priority)
        if let Some(root) = store_dir {
            config.store.root = Some(root);
        }

        Ok(config)
    }

    /// Directory the durable store lives in.
    ///
    /// Falls back to the platform data dir, then to a relative path when no
    /// data dir exists.
    pub fn store_root(&self) -> PathBuf {
        self.store
            .root
            .clone()
            .or_else(|| FileStore::default_root("slate"))
            .unwrap_or_else(|| PathBuf::from(".slate/store"))
    }

    /// Polling fallback interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.sync.poll_interval_ms)
    }

    /// File watcher debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.sync.debounce_ms)
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("slate");
        Ok(config_dir.join("config.toml"))
    }

    /// Create a new config file with example values
    pub fn create_example(path: &PathBuf) -> Result<()> {
        let example = r#"# slate CLI configuration
# Location: ~/.config/slate/config.toml

[store]
# Directory holding the durable entries.
# Default: the platform data dir, e.g. ~/.local/share/slate/store
# root = "/home/user/.local/share/slate/store"

[sync]
# Polling fallback interval in milliseconds.
# Changes made by other processes are picked up at least this often even
# when file notifications are unavailable.
poll_interval_ms = 500

# File watcher debounce window in milliseconds.
debounce_ms = 100

# Broadcast capacity for same-process updates.
bus_capacity = 64
"#;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        std::fs::write(path, example).context("Failed to write config file")?;

        Ok(())
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        // Check for test mode environment variable to skip loading user config
        if std::env::var("SLATE_TEST_MODE").is_ok() {
            return Ok(Self::default());
        }

        let path = config_file
            .or_else(|| Self::default_config_path().ok())
            .and_then(|p| if p.exists() { Some(p) } else { None });

        if let Some(path) = path {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }

    /// Display the current configuration as JSON
    pub fn display_as_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config as JSON")
    }
}
