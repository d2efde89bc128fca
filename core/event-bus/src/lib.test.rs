use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn subscriber_receives_published_event() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(&"s1".to_string());

    bus.publish(BrainEvent::new("s1", BrainEventType::LoopStart, json!({"ok": true})));

    let received = rx.recv().await.unwrap_or_else(|e| panic!("recv failed: {e}"));
    assert_eq!(received.session_id, "s1");
    assert_eq!(received.event_type, BrainEventType::LoopStart);
}

#[tokio::test]
async fn events_for_other_sessions_are_not_delivered() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(&"s1".to_string());

    bus.publish(BrainEvent::new("s2", BrainEventType::LoopStart, json!(null)));

    assert!(rx.try_recv().is_err());
}

#[test]
fn publish_with_no_subscribers_does_not_panic() {
    let bus = EventBus::new();
    bus.publish(BrainEvent::new("s1", BrainEventType::LoopDone, json!(null)));
}
