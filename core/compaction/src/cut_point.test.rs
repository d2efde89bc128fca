use pretty_assertions::assert_eq;
use talon_types::MessageRole;

use super::*;

fn message(role: MessageRole, id: &str) -> SessionEntry {
    SessionEntry::Message { role, text: id.to_string(), id: id.to_string() }
}

fn label(id: &str) -> SessionEntry {
    SessionEntry::Label { label: id.to_string(), id: id.to_string() }
}

#[test]
fn cuts_at_keep_tail_from_the_end() {
    let entries = vec![
        message(MessageRole::User, "a"),
        message(MessageRole::Assistant, "b"),
        message(MessageRole::User, "c"),
        message(MessageRole::Assistant, "d"),
    ];
    let cut = find_cut_point(FindCutPointInput { entries: &entries, keep_tail: 2, split_turn: false });
    assert_eq!(cut, CutPoint { cut_index: 2, first_kept_entry_id: Some("c".to_string()) });
}

#[test]
fn split_turn_walks_back_to_a_turn_boundary() {
    let entries = vec![
        message(MessageRole::User, "a"),
        message(MessageRole::User, "b"),
        message(MessageRole::Assistant, "c"),
        message(MessageRole::Tool, "d"),
    ];
    // keep_tail=1 puts the naive cut at index 3 (the tool entry), which is
    // neither user nor system: split_turn should walk back to index 1.
    let cut = find_cut_point(FindCutPointInput { entries: &entries, keep_tail: 1, split_turn: true });
    assert_eq!(cut, CutPoint { cut_index: 1, first_kept_entry_id: Some("b".to_string()) });
}

#[test]
fn split_turn_stops_at_a_non_message_entry() {
    let entries = vec![message(MessageRole::Assistant, "a"), label("b"), message(MessageRole::Assistant, "c")];
    let cut = find_cut_point(FindCutPointInput { entries: &entries, keep_tail: 1, split_turn: true });
    assert_eq!(cut, CutPoint { cut_index: 1, first_kept_entry_id: Some("b".to_string()) });
}

#[test]
fn keep_tail_of_zero_still_keeps_at_least_one_entry() {
    let entries = vec![message(MessageRole::User, "a"), message(MessageRole::Assistant, "b")];
    let cut = find_cut_point(FindCutPointInput { entries: &entries, keep_tail: 0, split_turn: false });
    assert_eq!(cut.cut_index, 1);
}

#[test]
fn empty_entries_cut_at_zero() {
    let entries: Vec<SessionEntry> = vec![];
    let cut = find_cut_point(FindCutPointInput { entries: &entries, keep_tail: 30, split_turn: true });
    assert_eq!(cut, CutPoint { cut_index: 0, first_kept_entry_id: None });
}
