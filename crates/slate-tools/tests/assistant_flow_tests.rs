//! End-to-end flow: an assistant turn requests a counter update, the tool
//! writes to the store, and a bound slot converges on the new value.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use slate_core::{MemoryStore, Slot, SlotBus, StateStore};
use slate_tools::{
    dispatch_tool_calls, AssistantChannel, AssistantChunk, MessagePart, ScriptedChannel, ToolCall,
    ToolRegistry, UpdateCounterTool,
};

fn counter_script() -> Vec<AssistantChunk> {
    vec![
        AssistantChunk::thinking("the user wants the counter set to 10"),
        AssistantChunk::calls(vec![ToolCall {
            name: "update_counter".to_string(),
            arguments: Some(json!({ "count": 10 })),
            id: Some("call_1".to_string()),
        }]),
        AssistantChunk::text("I've set the counter to 10."),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_assistant_turn_updates_observed_counter() {
    let store = MemoryStore::new();
    let bus = SlotBus::default();

    let slot: Slot<i64> = Slot::bind("counter", 0, Arc::new(store.clone()), bus.clone())
        .await
        .unwrap();
    assert_eq!(slot.get(), 0);

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(UpdateCounterTool::new(Arc::new(store.clone()))));

    let mut channel = ScriptedChannel::new(counter_script());
    let reply = channel
        .send_message("set the counter to 10".to_string())
        .await
        .unwrap();

    assert!(matches!(
        reply.message.parts.first(),
        Some(MessagePart::Thinking { .. })
    ));
    assert_eq!(reply.message.text(), "I've set the counter to 10.");
    assert_eq!(reply.tool_calls.len(), 1);

    let outcomes = dispatch_tool_calls(&registry, &reply.tool_calls).await;
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].error.is_none());

    // The tool wrote straight to the store; the slot finds it on its next poll.
    assert_eq!(store.get("counter").unwrap(), Some("10".to_string()));
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(slot.get(), 10);

    slot.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_call_leaves_counter_untouched() {
    let store = MemoryStore::new();
    let bus = SlotBus::default();

    let slot: Slot<i64> = Slot::bind("counter", 7, Arc::new(store.clone()), bus.clone())
        .await
        .unwrap();

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(UpdateCounterTool::new(Arc::new(store.clone()))));

    let calls = vec![ToolCall {
        name: "update_counter".to_string(),
        arguments: Some(json!({ "count": "not a number" })),
        id: None,
    }];
    let outcomes = dispatch_tool_calls(&registry, &calls).await;

    assert!(outcomes[0].error.is_some());
    assert_eq!(store.get("counter").unwrap(), None);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(slot.get(), 7);

    slot.close().await;
}
