//! slate CLI library
//!
//! This library provides the functionality behind the `slate` binary:
//! argument parsing, configuration loading, and the command implementations
//! that read, write, and follow synchronized values.

pub mod cli;
pub mod commands;
pub mod config;
pub mod counter;
