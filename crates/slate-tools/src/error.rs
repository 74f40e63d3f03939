//! Error types for tool definition and invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while invoking tools.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ToolError {
    /// No tool with the requested name is registered.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments did not match the tool's parameter schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran but could not complete its work.
    #[error("Tool execution failed: {0}")]
    Failed(String),

    /// The tool could not reach the value store backing it.
    #[error("Store error: {0}")]
    Store(String),
}

impl From<slate_core::Error> for ToolError {
    fn from(err: slate_core::Error) -> Self {
        ToolError::Store(err.to_string())
    }
}

/// Result type for tool operations.
pub type ToolResult<T> = std::result::Result<T, ToolError>;
