use super::*;
use pretty_assertions::assert_eq;

fn input(action: &str) -> ExecuteStepInput {
    ExecuteStepInput {
        session_id: "s1".into(),
        mode: None,
        capability: None,
        action: action.into(),
        args: None,
        verify_policy: None,
    }
}

#[test]
fn critical_action_matches_case_insensitively() {
    assert!(input("Navigate").is_critical_action());
    assert!(input("CLICK_BUTTON").is_critical_action());
    assert!(input("fill_form").is_critical_action());
}

#[test]
fn noncritical_action_does_not_match() {
    assert!(!input("read_something").is_critical_action());
}

#[test]
fn failure_sets_ok_false_with_message() {
    let result = ExecuteStepResult::failure("boom");
    assert!(!result.ok);
    assert_eq!(result.error.as_deref(), Some("boom"));
}
