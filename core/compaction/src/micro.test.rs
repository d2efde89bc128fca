use pretty_assertions::assert_eq;
use talon_types::MessageRole;

use super::*;

#[test]
fn flags_oversized_tool_results_only() {
    let entries = vec![
        SessionEntry::Message { role: MessageRole::Tool, text: "x".repeat(50), id: "a".to_string() },
        SessionEntry::Message { role: MessageRole::Tool, text: "x".repeat(5), id: "b".to_string() },
        SessionEntry::Message { role: MessageRole::User, text: "x".repeat(50), id: "c".to_string() },
    ];
    let candidates = micro_compact_candidates(&entries, 20);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].entry_id, "a");
}

#[test]
fn estimated_savings_sums_candidate_tokens() {
    let candidates = vec![
        MicroCompactCandidate { entry_id: "a".to_string(), estimated_tokens: 10 },
        MicroCompactCandidate { entry_id: "b".to_string(), estimated_tokens: 5 },
    ];
    assert_eq!(estimated_savings_tokens(&candidates), 15);
}
