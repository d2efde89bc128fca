use super::*;
use pretty_assertions::assert_eq;

#[test]
fn override_wins_only_on_present_fields() {
    let builtin = CapabilityExecutionPolicy {
        fallback_mode: Some(Mode::Cdp),
        default_verify_policy: Some(VerifyPolicy::OnCritical),
        lease_policy: Some(LeasePolicy::Auto),
        allow_script_fallback: Some(true),
    };
    let override_ = CapabilityExecutionPolicy {
        fallback_mode: None,
        default_verify_policy: Some(VerifyPolicy::Always),
        lease_policy: None,
        allow_script_fallback: None,
    };

    let merged = builtin.merged_with(&override_);
    assert_eq!(merged.fallback_mode, Some(Mode::Cdp));
    assert_eq!(merged.default_verify_policy, Some(VerifyPolicy::Always));
    assert_eq!(merged.lease_policy, Some(LeasePolicy::Auto));
    assert_eq!(merged.allow_script_fallback, Some(true));
}
