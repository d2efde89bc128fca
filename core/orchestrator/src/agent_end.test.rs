use std::sync::Arc;

use pretty_assertions::assert_eq;
use talon_config::KernelConfig;
use talon_session::RunState;
use talon_types::DequeueMode;
use talon_types::MessageRole;
use talon_types::SessionEntry;

use crate::AgentEndDecision;
use crate::AgentEndError;
use crate::AgentEndOutcome;
use crate::is_retryable;
use crate::test_support::FakeStore;
use crate::test_support::FakeSummarizer;
use crate::test_support::builder;

fn message(id: &str, text: &str) -> SessionEntry {
    SessionEntry::Message { role: MessageRole::User, text: text.to_string(), id: id.to_string() }
}

#[test]
fn a_500_status_is_retryable() {
    let outcome = AgentEndOutcome { error: Some(AgentEndError { status: Some(503), code: None, message: None }), overflow: false };
    assert!(is_retryable(&outcome));
}

#[test]
fn overflow_is_never_retryable_even_with_a_retryable_error() {
    let outcome = AgentEndOutcome { error: Some(AgentEndError { status: Some(503), code: None, message: None }), overflow: true };
    assert!(!is_retryable(&outcome));
}

#[test]
fn a_network_message_needle_is_retryable() {
    let outcome = AgentEndOutcome {
        error: Some(AgentEndError { status: None, code: None, message: Some("Network unreachable".to_string()) }),
        overflow: false,
    };
    assert!(is_retryable(&outcome));
}

#[test]
fn a_400_status_with_no_matching_needle_is_not_retryable() {
    let outcome = AgentEndOutcome { error: Some(AgentEndError { status: Some(400), code: None, message: None }), overflow: false };
    assert!(!is_retryable(&outcome));
}

#[tokio::test]
async fn a_retryable_error_schedules_a_retry_before_considering_compaction() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hi")], ""));
    let (_hooks, orchestrator) = builder(store, Arc::new(FakeSummarizer::returning("summary")), None, Default::default()).build();

    let mut state = RunState::create_session("s1".to_string(), 3, DequeueMode::OneAtATime);
    state.running = true;
    let outcome = AgentEndOutcome { error: Some(AgentEndError { status: Some(503), code: None, message: None }), overflow: false };

    let decision = orchestrator
        .handle_agent_end(&mut state, outcome)
        .await
        .unwrap_or_else(|e| panic!("handle_agent_end failed: {e}"));

    match decision {
        AgentEndDecision::Retry { delay_ms, .. } => assert_eq!(delay_ms, 500),
        other => panic!("expected Retry, got {other:?}"),
    }
    assert_eq!(state.retry.attempt, 1);
    assert!(state.retry.active);
}

#[tokio::test]
async fn retries_exhausted_then_falls_through_to_compaction_when_overflowing() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hi")], ""));
    let (_hooks, orchestrator) = builder(store, Arc::new(FakeSummarizer::returning("summary")), None, Default::default()).build();

    let mut state = RunState::create_session("s1".to_string(), 0, DequeueMode::OneAtATime);
    state.running = true;
    let outcome = AgentEndOutcome { error: None, overflow: true };

    let decision = orchestrator
        .handle_agent_end(&mut state, outcome)
        .await
        .unwrap_or_else(|e| panic!("handle_agent_end failed: {e}"));

    match decision {
        AgentEndDecision::Continue { reason } => assert_eq!(reason, "compaction_overflow"),
        other => panic!("expected Continue, got {other:?}"),
    }
    assert!(!state.compacting);
}

#[tokio::test]
async fn a_clean_finish_with_nothing_due_is_done() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hi")], ""));
    let mut config = KernelConfig::default();
    config.compaction.threshold_tokens = 100_000;
    let (_hooks, orchestrator) = builder(store, Arc::new(FakeSummarizer::returning("summary")), None, config).build();

    let mut state = RunState::create_session("s1".to_string(), 3, DequeueMode::OneAtATime);
    state.running = true;
    let outcome = AgentEndOutcome::default();

    let decision = orchestrator
        .handle_agent_end(&mut state, outcome)
        .await
        .unwrap_or_else(|e| panic!("handle_agent_end failed: {e}"));

    assert_eq!(decision, AgentEndDecision::Done { reason: "completed".to_string() });
}

#[tokio::test]
async fn a_stopped_session_is_done_without_touching_retry_or_compaction() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hi")], ""));
    let (_hooks, orchestrator) = builder(store, Arc::new(FakeSummarizer::returning("summary")), None, Default::default()).build();

    let mut state = RunState::create_session("s1".to_string(), 3, DequeueMode::OneAtATime);
    state.running = true;
    state.stop();
    let outcome = AgentEndOutcome { error: Some(AgentEndError { status: Some(503), code: None, message: None }), overflow: false };

    let decision = orchestrator
        .handle_agent_end(&mut state, outcome)
        .await
        .unwrap_or_else(|e| panic!("handle_agent_end failed: {e}"));

    assert_eq!(decision, AgentEndDecision::Done { reason: "stopped".to_string() });
    assert_eq!(state.retry.attempt, 0);
}

#[tokio::test]
async fn threshold_compaction_runs_when_token_usage_is_over_the_configured_limit() {
    let entries: Vec<SessionEntry> = (0..50).map(|i| message(&format!("e{i}"), &"word ".repeat(50))).collect();
    let store = Arc::new(FakeStore::with_entries(entries, ""));
    let mut config = KernelConfig::default();
    config.compaction.threshold_tokens = 10;
    let (_hooks, orchestrator) = builder(store.clone(), Arc::new(FakeSummarizer::returning("summary")), None, config).build();

    let mut state = RunState::create_session("s1".to_string(), 3, DequeueMode::OneAtATime);
    state.running = true;
    let outcome = AgentEndOutcome::default();

    let decision = orchestrator
        .handle_agent_end(&mut state, outcome)
        .await
        .unwrap_or_else(|e| panic!("handle_agent_end failed: {e}"));

    match decision {
        AgentEndDecision::Continue { reason } => assert_eq!(reason, "compaction_threshold"),
        other => panic!("expected Continue, got {other:?}"),
    }
    assert_eq!(store.compactions.lock().unwrap_or_else(|e| e.into_inner()).len(), 1);
}
