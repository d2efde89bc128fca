//! Per-session trace serialiser (spec §4.9.6).
//!
//! Every emitted event is appended to a per-session FIFO ring (cap
//! `TraceConfig::ring_cap`) and flushed in batches of `chunk_size` to the
//! external session store. Writes for one session go through a single
//! [`talon_async_tail::SerialTail`] so on-disk ordering matches emission
//! order even when producers race; a failed flush does not poison the tail
//! — the next chunk for that session still gets its turn.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use talon_async_tail::SerialTail;
use talon_host::SessionStore;
use talon_host::trace_id_for;
use talon_types::SessionId;
use talon_types::StepTraceRecord;

struct SessionTraceState {
    ring: VecDeque<StepTraceRecord>,
    pending: Vec<StepTraceRecord>,
    next_chunk_index: usize,
    tail: Arc<SerialTail>,
}

impl SessionTraceState {
    fn new() -> Self {
        Self {
            ring: VecDeque::new(),
            pending: Vec::new(),
            next_chunk_index: 0,
            tail: Arc::new(SerialTail::new()),
        }
    }
}

/// Serialises and persists every event the orchestrator emits, and answers
/// `getStepStream` from the in-memory ring or, failing that, the store.
pub struct TraceSerializer {
    session_store: Arc<dyn SessionStore>,
    ring_cap: usize,
    chunk_size: usize,
    sessions: Mutex<HashMap<SessionId, SessionTraceState>>,
}

impl TraceSerializer {
    pub fn new(session_store: Arc<dyn SessionStore>, ring_cap: usize, chunk_size: usize) -> Self {
        Self {
            session_store,
            ring_cap: ring_cap.max(1),
            chunk_size: chunk_size.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Append `record` to the session's ring, and flush a chunk to the
    /// store once `chunk_size` records have accumulated.
    pub async fn record(&self, record: StepTraceRecord) {
        let session_id = record.session_id.clone();
        let (tail, chunk) = {
            let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
            let state = sessions.entry(session_id.clone()).or_insert_with(SessionTraceState::new);

            state.ring.push_back(record.clone());
            while state.ring.len() > self.ring_cap {
                state.ring.pop_front();
            }

            state.pending.push(record);
            if state.pending.len() >= self.chunk_size {
                let chunk_index = state.next_chunk_index;
                state.next_chunk_index += 1;
                let chunk = std::mem::take(&mut state.pending);
                (Some(Arc::clone(&state.tail)), Some((chunk_index, chunk)))
            } else {
                (None, None)
            }
        };

        if let (Some(tail), Some((chunk_index, chunk))) = (tail, chunk) {
            let store = Arc::clone(&self.session_store);
            let trace_id = trace_id_for(&session_id);
            let outcome = tail
                .run(async move { store.append_trace_chunk(&trace_id, chunk_index, chunk).await })
                .await;
            if let Err(err) = outcome {
                tracing::warn!(session_id = %session_id, error = %err, "trace chunk flush failed");
            }
        }
    }

    /// Serve the step stream from the in-memory ring when the session has
    /// one, otherwise replay up to 64 chunks from the store.
    pub async fn get_step_stream(&self, session_id: &SessionId) -> Vec<StepTraceRecord> {
        {
            let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(state) = sessions.get(session_id) {
                return state.ring.iter().cloned().collect();
            }
        }

        let trace_id = trace_id_for(session_id);
        let mut records = Vec::new();
        for chunk_index in 0..64 {
            match self.session_store.read_trace_chunk(&trace_id, chunk_index).await {
                Ok(chunk) if !chunk.is_empty() => records.extend(chunk),
                _ => break,
            }
        }
        records
    }
}

/// Events the orchestrator is aware of as named hook/event points (spec
/// §6). Kept as a constant list so callers can't typo a hook name.
pub mod hooks {
    pub const STEP_BEFORE_EXECUTE: &str = "step.before_execute";
    pub const STEP_AFTER_EXECUTE: &str = "step.after_execute";
    pub const TOOL_BEFORE_CALL: &str = "tool.before_call";
    pub const TOOL_AFTER_RESULT: &str = "tool.after_result";
    pub const AGENT_END_BEFORE: &str = "agent_end.before";
    pub const AGENT_END_AFTER: &str = "agent_end.after";
    pub const COMPACTION_CHECK_BEFORE: &str = "compaction.check.before";
    pub const COMPACTION_CHECK_AFTER: &str = "compaction.check.after";
    pub const COMPACTION_BEFORE: &str = "compaction.before";
    pub const COMPACTION_SUMMARY: &str = "compaction.summary";
    pub const COMPACTION_AFTER: &str = "compaction.after";
    pub const COMPACTION_ERROR: &str = "compaction.error";
}

#[cfg(test)]
#[path = "trace.test.rs"]
mod tests;
