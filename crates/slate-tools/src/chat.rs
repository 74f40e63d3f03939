//! Assistant conversation types and the channel trait model backends implement.
//!
//! The channel is the seam between the UI and whatever produces assistant
//! output. Streamed chunks carry text deltas, thinking deltas, and tool
//! calls; [`dispatch_tool_calls`] runs the calls against a registry and
//! collects their outcomes for the next turn.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::registry::ToolRegistry;

/// Errors from an assistant channel.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ChatError {
    /// The channel could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The stream broke mid-conversation.
    #[error("Stream error: {0}")]
    Stream(String),

    /// The channel rejected the outgoing message.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for channel operations.
pub type ChatResult<T> = std::result::Result<T, ChatError>;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The person typing into the chat.
    User,
    /// The assistant on the other end of the channel.
    Assistant,
}

/// One piece of a message.
///
/// Assistant messages can interleave visible text with thinking sections;
/// renderers typically show the latter collapsed or dimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    /// Plain text shown to the user.
    Text {
        /// The text content.
        text: String,
    },
    /// Reasoning the assistant produced before answering.
    Thinking {
        /// The thinking content.
        text: String,
    },
}

/// A complete message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique id for the message.
    pub id: String,
    /// Who sent the message.
    pub role: MessageRole,
    /// The ordered parts making up the message.
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    /// A user message holding a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            parts: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// An assistant message from already-assembled parts.
    pub fn assistant(parts: Vec<MessagePart>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            parts,
        }
    }

    /// Concatenated text of all visible parts, thinking excluded.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text { text } => Some(text.as_str()),
                MessagePart::Thinking { .. } => None,
            })
            .collect()
    }
}

/// A tool call requested by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments for the tool, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
    /// Backend-assigned call id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Outcome of one dispatched tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallOutcome {
    /// Name of the tool that ran.
    pub name: String,
    /// Serialized result, empty when the call failed.
    pub result: String,
    /// Error message when the call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One streamed chunk of an assistant turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantChunk {
    /// Text delta to append to the visible reply.
    pub delta: String,

    /// Whether this chunk ends the turn.
    pub done: bool,

    /// Thinking delta, rendered as a thinking part.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,

    /// Tool calls requested in this chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Outcomes fed back after tool dispatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolCallOutcome>>,
}

impl AssistantChunk {
    /// A plain text delta.
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            ..Self::default()
        }
    }

    /// A thinking delta.
    pub fn thinking(text: impl Into<String>) -> Self {
        Self {
            thinking: Some(text.into()),
            ..Self::default()
        }
    }

    /// A chunk carrying tool calls.
    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: Some(tool_calls),
            ..Self::default()
        }
    }

    /// Mark this chunk as the end of the turn.
    pub fn ending(mut self) -> Self {
        self.done = true;
        self
    }
}

/// An assistant turn collected from a full stream.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    /// The assembled assistant message.
    pub message: ChatMessage,
    /// All tool calls requested during the turn.
    pub tool_calls: Vec<ToolCall>,
}

/// Channel to an assistant backend.
#[async_trait]
pub trait AssistantChannel: Send + Sync {
    /// Send a message and stream the assistant's response chunks.
    async fn send_message_stream(
        &mut self,
        message: String,
    ) -> ChatResult<BoxStream<'static, ChatResult<AssistantChunk>>>;

    /// Send a message and collect the full response.
    ///
    /// Thinking deltas become a single thinking part ahead of the visible
    /// text, matching how streamed turns usually arrive.
    async fn send_message(&mut self, message: String) -> ChatResult<AssistantReply> {
        let mut stream = self.send_message_stream(message).await?;

        let mut text = String::new();
        let mut thinking = String::new();
        let mut tool_calls = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            text.push_str(&chunk.delta);
            if let Some(delta) = chunk.thinking {
                thinking.push_str(&delta);
            }
            if let Some(calls) = chunk.tool_calls {
                tool_calls.extend(calls);
            }
            if chunk.done {
                break;
            }
        }

        let mut parts = Vec::new();
        if !thinking.is_empty() {
            parts.push(MessagePart::Thinking { text: thinking });
        }
        if !text.is_empty() {
            parts.push(MessagePart::Text { text });
        }

        Ok(AssistantReply {
            message: ChatMessage::assistant(parts),
            tool_calls,
        })
    }

    /// Whether the channel is currently usable.
    fn is_connected(&self) -> bool;
}

/// Run every requested tool call against the registry.
///
/// Calls are dispatched in order and failures do not stop later calls; each
/// failure is recorded in its outcome instead.
pub async fn dispatch_tool_calls(
    registry: &ToolRegistry,
    calls: &[ToolCall],
) -> Vec<ToolCallOutcome> {
    let mut outcomes = Vec::with_capacity(calls.len());

    for call in calls {
        let arguments = call.arguments.clone().unwrap_or(Value::Null);
        let outcome = match registry.invoke(&call.name, arguments).await {
            Ok(result) => ToolCallOutcome {
                name: call.name.clone(),
                result: result.to_string(),
                error: None,
            },
            Err(err) => {
                warn!(tool = %call.name, error = %err, "tool call failed during dispatch");
                ToolCallOutcome {
                    name: call.name.clone(),
                    result: String::new(),
                    error: Some(err.to_string()),
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

/// Channel that replays a fixed script of chunks.
///
/// Useful for exercising consumers without a live backend.
pub struct ScriptedChannel {
    script: Vec<AssistantChunk>,
    connected: bool,
}

impl ScriptedChannel {
    /// Create a channel that will replay the given chunks once.
    pub fn new(script: Vec<AssistantChunk>) -> Self {
        Self {
            script,
            connected: true,
        }
    }

    /// Create a disconnected channel that fails every send.
    pub fn disconnected() -> Self {
        Self {
            script: Vec::new(),
            connected: false,
        }
    }
}

#[async_trait]
impl AssistantChannel for ScriptedChannel {
    async fn send_message_stream(
        &mut self,
        _message: String,
    ) -> ChatResult<BoxStream<'static, ChatResult<AssistantChunk>>> {
        if !self.connected {
            return Err(ChatError::Connection("channel is disconnected".to_string()));
        }

        let last = self.script.len().saturating_sub(1);
        let chunks: Vec<ChatResult<AssistantChunk>> = self
            .script
            .clone()
            .into_iter()
            .enumerate()
            .map(|(i, mut chunk)| {
                if i == last {
                    chunk.done = true;
                }
                Ok(chunk)
            })
            .collect();

        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::UpdateCounterTool;
    use serde_json::json;
    use slate_core::{MemoryStore, StateStore};
    use std::sync::Arc;

    #[test]
    fn test_message_part_wire_shape() {
        let part = MessagePart::Thinking {
            text: "weighing options".to_string(),
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, json!({ "type": "thinking", "text": "weighing options" }));

        let back: MessagePart = serde_json::from_value(json).unwrap();
        assert_eq!(back, part);
    }

    #[test]
    fn test_message_text_skips_thinking() {
        let message = ChatMessage::assistant(vec![
            MessagePart::Thinking {
                text: "hmm".to_string(),
            },
            MessagePart::Text {
                text: "The counter is now 5.".to_string(),
            },
        ]);
        assert_eq!(message.text(), "The counter is now 5.");
    }

    #[tokio::test]
    async fn test_scripted_channel_marks_last_chunk_done() {
        let mut channel = ScriptedChannel::new(vec![
            AssistantChunk::text("Hello"),
            AssistantChunk::text(", world"),
        ]);

        let mut stream = channel.send_message_stream("hi".to_string()).await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();

        assert!(!first.done);
        assert!(second.done);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_send_message_collects_parts_and_calls() {
        let mut channel = ScriptedChannel::new(vec![
            AssistantChunk::thinking("the user wants the counter at ten"),
            AssistantChunk::calls(vec![ToolCall {
                name: "update_counter".to_string(),
                arguments: Some(json!({ "count": 10 })),
                id: Some("call_1".to_string()),
            }]),
            AssistantChunk::text("Done, the counter is 10."),
        ]);

        let reply = channel.send_message("set it to ten".to_string()).await.unwrap();

        assert_eq!(reply.message.role, MessageRole::Assistant);
        assert_eq!(reply.message.parts.len(), 2);
        assert!(matches!(reply.message.parts[0], MessagePart::Thinking { .. }));
        assert_eq!(reply.message.text(), "Done, the counter is 10.");
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].name, "update_counter");
    }

    #[tokio::test]
    async fn test_disconnected_channel_errors() {
        let mut channel = ScriptedChannel::disconnected();
        assert!(!channel.is_connected());

        let err = channel.send_message("hi".to_string()).await.unwrap_err();
        assert!(matches!(err, ChatError::Connection(_)));
    }

    #[tokio::test]
    async fn test_dispatch_runs_counter_tool() {
        let store = MemoryStore::new();
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(UpdateCounterTool::new(Arc::new(store.clone()))));

        let calls = vec![ToolCall {
            name: "update_counter".to_string(),
            arguments: Some(json!({ "count": 5 })),
            id: None,
        }];
        let outcomes = dispatch_tool_calls(&registry, &calls).await;

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].error.is_none());
        assert_eq!(outcomes[0].result, json!({ "success": true }).to_string());
        assert_eq!(store.get("counter").unwrap(), Some("5".to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_records_failures_and_continues() {
        let store = MemoryStore::new();
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(UpdateCounterTool::new(Arc::new(store.clone()))));

        let calls = vec![
            ToolCall {
                name: "missing_tool".to_string(),
                arguments: None,
                id: None,
            },
            ToolCall {
                name: "update_counter".to_string(),
                arguments: Some(json!({ "count": 2 })),
                id: None,
            },
        ];
        let outcomes = dispatch_tool_calls(&registry, &calls).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].error.is_some());
        assert!(outcomes[1].error.is_none());
        assert_eq!(store.get("counter").unwrap(), Some("2".to_string()));
    }
}
