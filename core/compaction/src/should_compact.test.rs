use pretty_assertions::assert_eq;
use talon_types::MessageRole;

use super::*;

fn message(role: MessageRole, text: &str) -> SessionEntry {
    SessionEntry::Message { role, text: text.to_string(), id: "e1".to_string() }
}

#[test]
fn overflow_beats_threshold() {
    let entries = vec![message(MessageRole::User, "hi")];
    let result = should_compact(ShouldCompactInput {
        overflow: true,
        entries: &entries,
        previous_summary: "",
        threshold_tokens: 1_000_000,
    });
    assert_eq!(result, ShouldCompactResult { should_compact: true, reason: Some(CompactionTrigger::Overflow) });
}

#[test]
fn threshold_fires_when_tokens_before_meets_it() {
    let entries = vec![message(MessageRole::User, &"x".repeat(400))];
    let result = should_compact(ShouldCompactInput {
        overflow: false,
        entries: &entries,
        previous_summary: "",
        threshold_tokens: 50,
    });
    assert_eq!(result, ShouldCompactResult { should_compact: true, reason: Some(CompactionTrigger::Threshold) });
}

#[test]
fn below_threshold_is_not_due() {
    let entries = vec![message(MessageRole::User, "hi")];
    let result = should_compact(ShouldCompactInput {
        overflow: false,
        entries: &entries,
        previous_summary: "",
        threshold_tokens: 1_000_000,
    });
    assert_eq!(result, ShouldCompactResult { should_compact: false, reason: None });
}
