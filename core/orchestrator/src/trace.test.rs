use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use talon_host::CreateSessionInput;
use talon_host::Result as HostResult;
use talon_host::SessionHeader;
use talon_types::CompactionDraftMeta;
use talon_types::EntryId;
use talon_types::MessageRole;
use talon_types::SessionContext;

use super::*;

#[derive(Default)]
struct FakeStore {
    chunks: StdMutex<HashMap<String, Vec<Vec<StepTraceRecord>>>>,
}

#[async_trait]
impl SessionStore for FakeStore {
    async fn create_session(&self, _input: CreateSessionInput) -> HostResult<SessionHeader> {
        Ok(SessionHeader { id: "s1".to_string() })
    }

    async fn append_message(&self, _session_id: &String, _role: MessageRole, _text: &str) -> HostResult<EntryId> {
        Ok("e1".to_string())
    }

    async fn append_compaction(
        &self,
        _session_id: &String,
        _reason: &str,
        _summary: &str,
        _meta: CompactionDraftMeta,
    ) -> HostResult<EntryId> {
        Ok("c1".to_string())
    }

    async fn build_session_context(&self, _session_id: &String) -> HostResult<SessionContext> {
        Ok(SessionContext::default())
    }

    async fn append_trace_chunk(&self, trace_id: &str, chunk_index: usize, records: Vec<StepTraceRecord>) -> HostResult<()> {
        let mut chunks = self.chunks.lock().unwrap_or_else(|e| e.into_inner());
        let bucket = chunks.entry(trace_id.to_string()).or_default();
        if bucket.len() <= chunk_index {
            bucket.resize(chunk_index + 1, Vec::new());
        }
        bucket[chunk_index] = records;
        Ok(())
    }

    async fn read_trace_chunk(&self, trace_id: &str, chunk_index: usize) -> HostResult<Vec<StepTraceRecord>> {
        let chunks = self.chunks.lock().unwrap_or_else(|e| e.into_inner());
        Ok(chunks.get(trace_id).and_then(|bucket| bucket.get(chunk_index)).cloned().unwrap_or_default())
    }
}

fn record(session_id: &str, n: usize) -> StepTraceRecord {
    StepTraceRecord {
        id: format!("rec-{n}"),
        session_id: session_id.to_string(),
        event_type: talon_types::BrainEventType::StepExecute,
        timestamp: "2024-01-01T00:00:00Z".to_string(),
        payload: serde_json::json!({"n": n}),
    }
}

#[tokio::test]
async fn records_below_chunk_size_stay_in_the_ring_and_never_flush() {
    let store = Arc::new(FakeStore::default());
    let serializer = TraceSerializer::new(store.clone(), 240, 80);

    for n in 0..5 {
        serializer.record(record("s1", n)).await;
    }

    let stream = serializer.get_step_stream(&"s1".to_string()).await;
    assert_eq!(stream.len(), 5);
    assert!(store.chunks.lock().unwrap_or_else(|e| e.into_inner()).is_empty());
}

#[tokio::test]
async fn a_full_chunk_flushes_to_the_store_in_order() {
    let store = Arc::new(FakeStore::default());
    let serializer = TraceSerializer::new(store.clone(), 240, 3);

    for n in 0..3 {
        serializer.record(record("s1", n)).await;
    }

    let chunks = store.chunks.lock().unwrap_or_else(|e| e.into_inner());
    let bucket = chunks.get("session-s1").unwrap_or_else(|| panic!("expected a flushed chunk"));
    assert_eq!(bucket[0].len(), 3);
    assert_eq!(bucket[0][0].id, "rec-0");
}

#[tokio::test]
async fn ring_trims_to_its_cap() {
    let store = Arc::new(FakeStore::default());
    let serializer = TraceSerializer::new(store, 2, 100);

    for n in 0..5 {
        serializer.record(record("s1", n)).await;
    }

    let stream = serializer.get_step_stream(&"s1".to_string()).await;
    assert_eq!(stream.len(), 2);
    assert_eq!(stream[0].id, "rec-3");
    assert_eq!(stream[1].id, "rec-4");
}

#[tokio::test]
async fn get_step_stream_replays_from_the_store_for_an_unknown_session() {
    let store = Arc::new(FakeStore::default());
    store
        .append_trace_chunk("session-s2", 0, vec![record("s2", 0), record("s2", 1)])
        .await
        .unwrap_or_else(|e| panic!("seed failed: {e}"));

    let serializer = TraceSerializer::new(store, 240, 80);
    let stream = serializer.get_step_stream(&"s2".to_string()).await;
    assert_eq!(stream.len(), 2);
}
