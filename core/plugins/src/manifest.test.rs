use std::collections::BTreeSet;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn timeout_defaults_to_1500ms() {
    let manifest = PluginManifest {
        id: "p".to_string(),
        name: "p".to_string(),
        version: "1.0.0".to_string(),
        timeout_ms: None,
        permissions: PluginPermissions::default(),
    };
    assert_eq!(manifest.timeout(), Duration::from_millis(1500));
}

#[test]
fn timeout_clamps_to_the_valid_range() {
    let mut manifest = PluginManifest {
        id: "p".to_string(),
        name: "p".to_string(),
        version: "1.0.0".to_string(),
        timeout_ms: Some(1),
        permissions: PluginPermissions::default(),
    };
    assert_eq!(manifest.timeout(), Duration::from_millis(50));

    manifest.timeout_ms = Some(999_999);
    assert_eq!(manifest.timeout(), Duration::from_millis(10_000));
}

#[test]
fn wildcard_permission_grants_every_key() {
    let permissions = PluginPermissions {
        hooks: Some(set(&["*"])),
        ..Default::default()
    };
    assert!(permissions.allows_hook("step.before_execute"));
    assert!(permissions.allows_hook("anything"));
}

#[test]
fn absent_permission_list_grants_nothing() {
    let permissions = PluginPermissions::default();
    assert!(!permissions.allows_hook("step.before_execute"));
    assert!(!permissions.allows_mode("script"));
    assert!(!permissions.allows_capability("browser.action"));
}

#[test]
fn named_permission_grants_only_that_key() {
    let permissions = PluginPermissions {
        capabilities: Some(set(&["browser.action"])),
        ..Default::default()
    };
    assert!(permissions.allows_capability("browser.action"));
    assert!(!permissions.allows_capability("fs.write"));
}
