use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn llm_profiles_field_accepts_a_list() {
    let field: LlmProfilesField = serde_json::from_value(json!([
        {"id": "default", "llm_base": "https://api.example.com"}
    ]))
    .unwrap_or_else(|e| panic!("deserialize failed: {e}"));

    let profiles = field.into_profiles();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id.as_deref(), Some("default"));
}

#[test]
fn llm_profiles_field_accepts_a_map_and_fills_id_from_key() {
    let field: LlmProfilesField = serde_json::from_value(json!({
        "default": {"llm_base": "https://api.example.com"}
    }))
    .unwrap_or_else(|e| panic!("deserialize failed: {e}"));

    let profiles = field.into_profiles();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id.as_deref(), Some("default"));
}

#[test]
fn map_entry_with_explicit_id_keeps_it_over_the_key() {
    let field: LlmProfilesField = serde_json::from_value(json!({
        "keyname": {"id": "explicit", "llm_base": "https://api.example.com"}
    }))
    .unwrap_or_else(|e| panic!("deserialize failed: {e}"));

    let profiles = field.into_profiles();
    assert_eq!(profiles[0].id.as_deref(), Some("explicit"));
}

#[test]
fn escalation_policy_normalizes_only_the_literal_disabled() {
    assert_eq!(EscalationPolicy::normalize(Some("disabled")), EscalationPolicy::Disabled);
    assert_eq!(EscalationPolicy::normalize(Some("upgrade_only")), EscalationPolicy::UpgradeOnly);
    assert_eq!(EscalationPolicy::normalize(Some("anything_else")), EscalationPolicy::UpgradeOnly);
    assert_eq!(EscalationPolicy::normalize(None), EscalationPolicy::UpgradeOnly);
}

#[test]
fn document_defaults_to_no_profiles() {
    let doc: LlmConfigDocument = serde_json::from_value(json!({}))
        .unwrap_or_else(|e| panic!("deserialize failed: {e}"));
    assert!(doc.llm_profiles.is_none());
    assert!(doc.llm_profile_chains.is_empty());
}
