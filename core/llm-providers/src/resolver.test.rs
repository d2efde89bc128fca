use pretty_assertions::assert_eq;
use talon_config::LlmConfigDocument;
use talon_config::LlmProfileConfig;
use talon_config::LlmProfilesField;

use super::*;

fn profile(id: &str, role: &str, base: &str, key: &str) -> LlmProfileConfig {
    LlmProfileConfig {
        id: Some(id.to_string()),
        llm_base: Some(base.to_string()),
        llm_key: Some(key.to_string()),
        model: None,
        role: Some(role.to_string()),
        llm_timeout_ms: None,
        llm_retry_max_attempts: None,
        llm_max_retry_delay_ms: None,
    }
}

#[test]
fn synthesizes_a_profile_from_legacy_top_level_fields() {
    let config = LlmConfigDocument {
        llm_base: Some("https://legacy.example.com".to_string()),
        llm_key: Some("legacy-key".to_string()),
        ..Default::default()
    };

    let resolved = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: None, role: None })
        .unwrap_or_else(|e| panic!("resolve failed: {e}"));

    assert_eq!(resolved.route.base_url, "https://legacy.example.com");
    assert_eq!(resolved.route.api_key, "legacy-key");
    assert_eq!(resolved.route.model, "gpt-5.3-codex");
}

#[test]
fn fails_profile_not_found_when_no_profiles_exist() {
    let config = LlmConfigDocument::default();
    let err = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: None, role: None }).unwrap_err();
    assert!(matches!(err, LlmProviderError::ProfileNotFound { .. }));
}

#[test]
fn fails_missing_llm_config_when_base_or_key_absent() {
    let config = LlmConfigDocument {
        llm_profiles: Some(LlmProfilesField::List(vec![LlmProfileConfig {
            id: Some("p1".to_string()),
            ..Default::default()
        }])),
        ..Default::default()
    };
    let err = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: None, role: None }).unwrap_err();
    assert!(matches!(err, LlmProviderError::MissingLlmConfig { .. }));
}

#[test]
fn picks_requested_profile_falling_back_to_default_then_first() {
    let config = LlmConfigDocument {
        llm_profiles: Some(LlmProfilesField::List(vec![
            profile("alpha", "worker", "https://alpha.example.com", "a-key"),
            profile("default", "worker", "https://default.example.com", "d-key"),
        ])),
        ..Default::default()
    };

    let resolved = resolve_llm_route(ResolveLlmRouteInput {
        config: &config,
        profile: Some("missing"),
        role: None,
    })
    .unwrap_or_else(|e| panic!("resolve failed: {e}"));
    assert_eq!(resolved.route.base_url, "https://default.example.com");

    let resolved = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: Some("alpha"), role: None })
        .unwrap_or_else(|e| panic!("resolve failed: {e}"));
    assert_eq!(resolved.route.base_url, "https://alpha.example.com");
}

#[test]
fn ordered_profiles_uses_explicit_chain_and_prepends_selected() {
    let mut chains = std::collections::BTreeMap::new();
    chains.insert("worker".to_string(), vec!["beta".to_string(), "gamma".to_string()]);

    let config = LlmConfigDocument {
        llm_profiles: Some(LlmProfilesField::List(vec![
            profile("alpha", "worker", "https://alpha.example.com", "a-key"),
            profile("beta", "worker", "https://beta.example.com", "b-key"),
            profile("gamma", "worker", "https://gamma.example.com", "g-key"),
        ])),
        llm_profile_chains: chains,
        ..Default::default()
    };

    let resolved = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: Some("alpha"), role: None })
        .unwrap_or_else(|e| panic!("resolve failed: {e}"));

    assert_eq!(resolved.ordered_profiles, vec!["alpha", "beta", "gamma"]);
}

#[test]
fn ordered_profiles_falls_back_to_same_role_profiles_without_explicit_chain() {
    let config = LlmConfigDocument {
        llm_profiles: Some(LlmProfilesField::List(vec![
            profile("alpha", "worker", "https://alpha.example.com", "a-key"),
            profile("beta", "worker", "https://beta.example.com", "b-key"),
            profile("other-role", "reviewer", "https://other.example.com", "o-key"),
        ])),
        ..Default::default()
    };

    let resolved = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: Some("alpha"), role: None })
        .unwrap_or_else(|e| panic!("resolve failed: {e}"));

    assert_eq!(resolved.ordered_profiles, vec!["alpha", "beta"]);
}

#[test]
fn escalation_policy_normalizes_from_config() {
    let config = LlmConfigDocument {
        llm_base: Some("https://example.com".to_string()),
        llm_key: Some("key".to_string()),
        escalation_policy: Some("disabled".to_string()),
        ..Default::default()
    };

    let resolved = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: None, role: None })
        .unwrap_or_else(|e| panic!("resolve failed: {e}"));
    assert_eq!(resolved.escalation_policy, talon_config::EscalationPolicy::Disabled);
}

#[test]
fn timeout_is_clamped_into_range() {
    let mut profile_over = profile("p1", "worker", "https://example.com", "key");
    profile_over.llm_timeout_ms = Some(999_999);
    let config = LlmConfigDocument {
        llm_profiles: Some(LlmProfilesField::List(vec![profile_over])),
        ..Default::default()
    };

    let resolved = resolve_llm_route(ResolveLlmRouteInput { config: &config, profile: None, role: None })
        .unwrap_or_else(|e| panic!("resolve failed: {e}"));
    assert_eq!(resolved.route.timeout_ms, 300_000);
}
