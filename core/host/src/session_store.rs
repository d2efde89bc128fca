//! The session store collaborator (spec §1, §6).
//!
//! An opaque key/value store keyed by session. The kernel only needs the
//! six operations below; everything else about how sessions are persisted
//! is the host's business.

use async_trait::async_trait;
use talon_types::CompactionDraftMeta;
use talon_types::EntryId;
use talon_types::MessageRole;
use talon_types::SessionContext;
use talon_types::SessionId;
use talon_types::StepTraceRecord;

use crate::error::Result;

/// Optional fields accepted by `createSession`.
#[derive(Debug, Clone, Default)]
pub struct CreateSessionInput {
    pub session_id: Option<SessionId>,
}

/// `createSession`'s return value: just enough to identify the new
/// session.
#[derive(Debug, Clone)]
pub struct SessionHeader {
    pub id: SessionId,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, input: CreateSessionInput) -> Result<SessionHeader>;

    async fn append_message(
        &self,
        session_id: &SessionId,
        role: MessageRole,
        text: &str,
    ) -> Result<EntryId>;

    async fn append_compaction(
        &self,
        session_id: &SessionId,
        reason: &str,
        summary: &str,
        meta: CompactionDraftMeta,
    ) -> Result<EntryId>;

    async fn build_session_context(&self, session_id: &SessionId) -> Result<SessionContext>;

    async fn append_trace_chunk(
        &self,
        trace_id: &str,
        chunk_index: usize,
        records: Vec<StepTraceRecord>,
    ) -> Result<()>;

    async fn read_trace_chunk(
        &self,
        trace_id: &str,
        chunk_index: usize,
    ) -> Result<Vec<StepTraceRecord>>;
}

/// `traceId = "session-<sessionId>"` (spec §6).
pub fn trace_id_for(session_id: &SessionId) -> String {
    format!("session-{session_id}")
}

#[cfg(test)]
#[path = "session_store.test.rs"]
mod tests;
