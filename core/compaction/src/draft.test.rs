use pretty_assertions::assert_eq;
use talon_types::MessageRole;

use super::*;

fn message(role: MessageRole, id: &str, text: &str) -> SessionEntry {
    SessionEntry::Message { role, text: text.to_string(), id: id.to_string() }
}

#[test]
fn zero_entries_is_an_identity_over_previous_summary() {
    let draft = prepare_compaction(&[], "old summary", 0, 1800);
    assert_eq!(draft.summary, "old summary");
    assert_eq!(draft.first_kept_entry_id, None);
    assert!(draft.kept_entries.is_empty());
    assert!(draft.dropped_entries.is_empty());
    assert_eq!(draft.tokens_before, draft.tokens_after);
}

#[test]
fn splits_entries_at_the_cut_index() {
    let entries = vec![
        message(MessageRole::User, "a", "hello"),
        message(MessageRole::Assistant, "b", "hi there"),
        message(MessageRole::User, "c", "what now"),
    ];
    let draft = prepare_compaction(&entries, "", 2, 1800);
    assert_eq!(draft.dropped_entries.len(), 2);
    assert_eq!(draft.kept_entries.len(), 1);
    assert_eq!(draft.first_kept_entry_id, Some("c".to_string()));
    assert!(draft.summary.contains("hello"));
    assert!(draft.summary.contains("hi there"));
    assert!(!draft.summary.contains("what now"));
}

#[test]
fn summary_is_bounded_by_max_summary_chars_keeping_the_tail() {
    let entries = vec![
        message(MessageRole::User, "a", &"a".repeat(50)),
        message(MessageRole::Assistant, "b", &"b".repeat(50)),
    ];
    let draft = prepare_compaction(&entries, "", 2, 20);
    assert_eq!(draft.summary.chars().count(), 20);
    assert!(draft.summary.chars().all(|c| c == 'b'));
}

#[test]
fn normalizes_blank_lines_and_trims() {
    let entries = vec![message(MessageRole::User, "a", "hello")];
    let draft = prepare_compaction(&entries, "\n\n  previous  \n\n\n", 1, 1800);
    assert!(!draft.summary.starts_with('\n'));
    assert!(!draft.summary.contains("\n\n\n"));
}
