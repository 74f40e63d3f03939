//! Tool registry and assistant channel seam for slate.
//!
//! Tools are named operations with JSON Schema parameter descriptions. An
//! assistant backend streams [`chat::AssistantChunk`]s over a
//! [`chat::AssistantChannel`]; when a chunk carries tool calls, the consumer
//! dispatches them through a [`registry::ToolRegistry`] and feeds the
//! outcomes back.
//!
//! The built-in [`counter::UpdateCounterTool`] writes a counter value
//! straight to a [`slate_core::StateStore`], from where bound slots pick it
//! up like any other external write.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod chat;
pub mod counter;
pub mod error;
pub mod handler;
pub mod registry;
pub mod types;

pub use chat::{
    dispatch_tool_calls, AssistantChannel, AssistantChunk, AssistantReply, ChatError, ChatMessage,
    ChatResult, MessagePart, MessageRole, ScriptedChannel, ToolCall, ToolCallOutcome,
};
pub use counter::{UpdateCounterTool, COUNTER_KEY};
pub use error::{ToolError, ToolResult};
pub use handler::ToolHandler;
pub use registry::ToolRegistry;
pub use types::ToolDefinition;

/// Commonly used types for working with tools and channels.
pub mod prelude {
    pub use crate::chat::{AssistantChannel, AssistantChunk, ChatMessage, MessagePart};
    pub use crate::error::{ToolError, ToolResult};
    pub use crate::handler::ToolHandler;
    pub use crate::registry::ToolRegistry;
    pub use crate::types::ToolDefinition;
}
