use super::*;
use pretty_assertions::assert_eq;

fn msg(role: MessageRole, id: &str) -> SessionEntry {
    SessionEntry::Message {
        role,
        text: format!("text-{id}"),
        id: id.to_string(),
    }
}

#[test]
fn id_reads_through_every_variant() {
    assert_eq!(msg(MessageRole::User, "e1").id(), "e1");
    assert_eq!(
        SessionEntry::Label {
            label: "l".into(),
            id: "e2".into()
        }
        .id(),
        "e2"
    );
}

#[test]
fn turn_boundary_only_for_user_or_system_messages() {
    assert!(msg(MessageRole::User, "e1").is_turn_boundary());
    assert!(msg(MessageRole::System, "e2").is_turn_boundary());
    assert!(!msg(MessageRole::Assistant, "e3").is_turn_boundary());
    assert!(!msg(MessageRole::Tool, "e4").is_turn_boundary());
    assert!(
        !SessionEntry::Label {
            label: "x".into(),
            id: "e5".into()
        }
        .is_turn_boundary()
    );
}
