use std::sync::Arc;

use pretty_assertions::assert_eq;
use talon_session::RunState;
use talon_types::DequeueMode;
use talon_types::MessageRole;
use talon_types::SessionEntry;

use crate::compaction::CompactionReason;
use crate::test_support::FakeStore;
use crate::test_support::FakeSummarizer;
use crate::test_support::builder;

fn message(id: &str, text: &str) -> SessionEntry {
    SessionEntry::Message { role: MessageRole::User, text: text.to_string(), id: id.to_string() }
}

fn session() -> RunState {
    let mut state = RunState::create_session("s1".to_string(), 3, DequeueMode::OneAtATime);
    state.running = true;
    state
}

#[tokio::test]
async fn run_compaction_appends_a_summary_and_clears_compacting_on_success() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hello"), message("e2", "world")], ""));
    let (_hooks, orchestrator) = builder(store.clone(), Arc::new(FakeSummarizer::returning("a tidy summary")), None, Default::default()).build();
    let mut state = session();

    let outcome = orchestrator
        .run_compaction(&mut state, CompactionReason::Manual, false)
        .await
        .unwrap_or_else(|e| panic!("run_compaction failed: {e}"));

    assert!(!state.compacting);
    assert_eq!(outcome.entry_id, "compaction-1");
    let compactions = store.compactions.lock().unwrap_or_else(|e| e.into_inner());
    assert_eq!(compactions.len(), 1);
    assert_eq!(compactions[0].0, "manual");
    assert_eq!(compactions[0].1, "a tidy summary");
}

#[tokio::test]
async fn an_empty_summary_is_an_error_and_clears_compacting() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hello")], ""));
    let (_hooks, orchestrator) = builder(store.clone(), Arc::new(FakeSummarizer::returning("   ")), None, Default::default()).build();
    let mut state = session();

    let result = orchestrator.run_compaction(&mut state, CompactionReason::Threshold, false).await;

    assert!(result.is_err());
    assert!(!state.compacting);
    assert!(store.compactions.lock().unwrap_or_else(|e| e.into_inner()).is_empty());
}

#[tokio::test]
async fn a_failing_summarizer_is_an_error_and_clears_compacting() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hello")], ""));
    let (_hooks, orchestrator) = builder(store, Arc::new(FakeSummarizer::failing()), None, Default::default()).build();
    let mut state = session();

    let result = orchestrator.run_compaction(&mut state, CompactionReason::Threshold, false).await;

    assert!(result.is_err());
    assert!(!state.compacting);
}

#[tokio::test]
async fn pre_send_compaction_check_runs_compaction_when_the_threshold_is_crossed() {
    let entries: Vec<SessionEntry> = (0..50).map(|i| message(&format!("e{i}"), &"word ".repeat(50))).collect();
    let store = Arc::new(FakeStore::with_entries(entries, ""));
    let mut config = talon_config::KernelConfig::default();
    config.compaction.threshold_tokens = 10;
    let (_hooks, orchestrator) = builder(store.clone(), Arc::new(FakeSummarizer::returning("summary")), None, config).build();
    let mut state = session();

    let ran = orchestrator
        .pre_send_compaction_check(&mut state)
        .await
        .unwrap_or_else(|e| panic!("pre_send_compaction_check failed: {e}"));

    assert!(ran);
    assert_eq!(store.compactions.lock().unwrap_or_else(|e| e.into_inner()).len(), 1);
}

#[tokio::test]
async fn pre_send_compaction_check_is_a_no_op_when_under_threshold() {
    let store = Arc::new(FakeStore::with_entries(vec![message("e1", "hi")], ""));
    let mut config = talon_config::KernelConfig::default();
    config.compaction.threshold_tokens = 100_000;
    let (_hooks, orchestrator) = builder(store.clone(), Arc::new(FakeSummarizer::returning("summary")), None, config).build();
    let mut state = session();

    let ran = orchestrator
        .pre_send_compaction_check(&mut state)
        .await
        .unwrap_or_else(|e| panic!("pre_send_compaction_check failed: {e}"));

    assert!(!ran);
    assert!(store.compactions.lock().unwrap_or_else(|e| e.into_inner()).is_empty());
}
