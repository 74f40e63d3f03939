//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl LogLevel {
    /// Directive fragment understood by the env filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser)]
#[command(name = "slate")]
#[command(about = "slate - synchronized persistent values shared across processes")]
#[command(version)]
#[command(arg_required_else_help = false)]
pub struct Cli {
    /// Subcommand to execute (defaults to listing keys if not provided)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/slate/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Store directory (overrides config file)
    #[arg(short = 's', long, global = true)]
    pub store_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a stored value
    Get {
        /// Key of the entry to read
        key: String,
    },

    /// Write a value
    ///
    /// The value is parsed as JSON; input that is not valid JSON is stored
    /// as a plain string, so `slate set theme dark` and
    /// `slate set theme '"dark"'` are equivalent.
    Set {
        /// Key of the entry to write
        key: String,

        /// Value to store
        value: String,
    },

    /// Remove a stored entry
    Remove {
        /// Key of the entry to remove
        key: String,
    },

    /// List all stored keys
    Keys,

    /// Follow a key and print every change until interrupted
    Watch {
        /// Key of the entry to follow
        key: String,

        /// Polling interval in milliseconds (overrides config file)
        #[arg(long)]
        poll_ms: Option<u64>,
    },

    /// Shared counter operations
    #[command(subcommand)]
    Counter(CounterCommands),

    /// List registered tools and their schemas
    Tools,

    /// Invoke a registered tool by name
    Call {
        /// Name of the tool to invoke
        name: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Operations on the shared counter.
#[derive(Subcommand)]
pub enum CounterCommands {
    /// Print the current counter value
    Show,

    /// Increase the counter
    Inc {
        /// Amount to add
        #[arg(default_value = "1")]
        by: i64,
    },

    /// Decrease the counter
    Dec {
        /// Amount to subtract
        #[arg(default_value = "1")]
        by: i64,
    },

    /// Set the counter to an exact value
    Set {
        /// New counter value
        value: i64,
    },

    /// Reset the counter to zero
    Reset,
}

/// Configuration management subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create a config file with documented defaults
    Init {
        /// Where to write the config file (defaults to the standard location)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(short = 'F', long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
}
