//! Trace record type (spec §3 "StepTraceRecord", §4.9.6).

use serde::Deserialize;
use serde::Serialize;

use crate::EntryId;
use crate::SessionId;
use crate::event::BrainEventType;

/// One record in a session's step trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTraceRecord {
    pub id: EntryId,
    pub session_id: SessionId,
    #[serde(rename = "type")]
    pub event_type: BrainEventType,
    /// ISO-8601 timestamp, as produced by `nowIso`.
    pub timestamp: String,
    pub payload: serde_json::Value,
}
