use pretty_assertions::assert_eq;
use talon_types::LeasePolicy;
use talon_types::VerifyPolicy;

use super::*;

#[test]
fn builtins_cover_the_seeded_capabilities() {
    let registry = CapabilityPolicyRegistry::with_builtins();
    for cap in [
        "process.exec",
        "fs.read",
        "fs.write",
        "fs.edit",
        "browser.snapshot",
        "browser.action",
        "browser.verify",
    ] {
        let entry = registry.get(cap).unwrap_or_else(|| panic!("missing builtin for {cap}"));
        assert_eq!(entry.source, PolicySource::Builtin);
    }
    assert!(registry.get("unknown.capability").is_none());
}

#[test]
fn override_wins_field_by_field() {
    let mut registry = CapabilityPolicyRegistry::with_builtins();
    registry.set_override(
        "fs.read",
        "plugin:fs.read",
        CapabilityExecutionPolicy {
            allow_script_fallback: Some(true),
            ..Default::default()
        },
    );

    let resolved = registry.resolve("fs.read");
    assert_eq!(resolved.allow_script_fallback, Some(true));
    assert_eq!(resolved.default_verify_policy, Some(VerifyPolicy::Off));
    assert_eq!(resolved.lease_policy, Some(LeasePolicy::None));
}

#[test]
fn get_prefers_override_over_builtin() {
    let mut registry = CapabilityPolicyRegistry::with_builtins();
    registry.set_override("fs.read", "ov-1", CapabilityExecutionPolicy::default());

    let entry = registry.get("fs.read").unwrap_or_else(|| panic!("expected entry"));
    assert_eq!(entry.source, PolicySource::Override);
    assert_eq!(entry.id, "ov-1");
}

#[test]
fn clear_override_restores_builtin_resolution() {
    let mut registry = CapabilityPolicyRegistry::with_builtins();
    let previous = registry.set_override(
        "fs.read",
        "ov-1",
        CapabilityExecutionPolicy { allow_script_fallback: Some(true), ..Default::default() },
    );
    assert!(previous.is_none());

    registry.clear_override("fs.read");
    let entry = registry.get("fs.read").unwrap_or_else(|| panic!("expected builtin"));
    assert_eq!(entry.source, PolicySource::Builtin);
}

#[test]
fn resolve_on_capability_with_no_builtin_uses_override_alone() {
    let mut registry = CapabilityPolicyRegistry::empty();
    registry.set_override(
        "custom.capability",
        "ov-1",
        CapabilityExecutionPolicy { allow_script_fallback: Some(false), ..Default::default() },
    );

    let resolved = registry.resolve("custom.capability");
    assert_eq!(resolved.allow_script_fallback, Some(false));
}
