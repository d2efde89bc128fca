use pretty_assertions::assert_eq;
use talon_config::EscalationPolicy;

use super::*;

#[test]
fn walks_the_chain_one_step_per_call() {
    let mut walker = EscalationWalker::new(
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        EscalationPolicy::UpgradeOnly,
    );
    assert_eq!(walker.current_profile(), Some("a"));

    let next = walker.next("429 rate limit");
    assert_eq!(next, Some("b"));
    assert_eq!(walker.history().len(), 1);
    assert_eq!(walker.history()[0].from_profile, "a");
    assert_eq!(walker.history()[0].to_profile, "b");

    assert_eq!(walker.next("still failing"), Some("c"));
    assert_eq!(walker.next("exhausted"), None);
}

#[test]
fn disabled_policy_never_advances() {
    let mut walker = EscalationWalker::new(
        vec!["a".to_string(), "b".to_string()],
        EscalationPolicy::Disabled,
    );
    assert_eq!(walker.next("anything"), None);
    assert!(walker.history().is_empty());
    assert_eq!(walker.current_profile(), Some("a"));
}
