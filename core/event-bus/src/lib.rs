//! Typed pub/sub of `BrainEvent`s keyed by session (spec §2 row 1).
//!
//! Every phase of the orchestrator fires events through this bus; the
//! trace serialiser is just one more subscriber, not a privileged sink
//! (DESIGN NOTES: "events flow one-way; the trace serialiser is
//! fire-and-forget").

use std::collections::HashMap;
use std::sync::Mutex;

use talon_types::BrainEventType;
use talon_types::SessionId;
use tokio::sync::broadcast;

/// One published event.
#[derive(Debug, Clone)]
pub struct BrainEvent {
    pub session_id: SessionId,
    pub event_type: BrainEventType,
    pub payload: serde_json::Value,
}

impl BrainEvent {
    pub fn new(
        session_id: impl Into<SessionId>,
        event_type: BrainEventType,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            event_type,
            payload,
        }
    }
}

const DEFAULT_CAPACITY: usize = 256;

/// Per-session broadcast hub. Channels are created lazily on first
/// subscribe and dropped once their sender side (owned by the bus) still
/// exists but every receiver has gone away — `tokio::sync::broadcast`
/// tolerates publishing with zero receivers, so idle sessions cost a
/// `HashMap` entry, nothing more.
pub struct EventBus {
    channels: Mutex<HashMap<SessionId, broadcast::Sender<BrainEvent>>>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Subscribe to every future event for `session_id`. Events published
    /// before this call are not replayed.
    pub fn subscribe(&self, session_id: &SessionId) -> broadcast::Receiver<BrainEvent> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels
            .entry(session_id.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish an event. A session with no subscribers simply drops it;
    /// this is not an error (fire-and-forget).
    pub fn publish(&self, event: BrainEvent) {
        tracing::debug!(
            session_id = %event.session_id,
            event_type = event.event_type.as_ref(),
            "publishing brain event"
        );
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        let tx = channels
            .entry(event.session_id.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        let _ = tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
