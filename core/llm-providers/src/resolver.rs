//! `resolveLlmRoute` (spec §4.5).

use talon_config::EscalationPolicy;
use talon_config::LlmConfigDocument;
use talon_config::LlmProfileConfig;
use talon_host::LlmRoute;

use crate::error;
use crate::error::Result;

const DEFAULT_MODEL: &str = "gpt-5.3-codex";
const DEFAULT_ROLE: &str = "worker";
const DEFAULT_TIMEOUT_MS: i64 = 30_000;
const DEFAULT_RETRY_MAX_ATTEMPTS: i64 = 2;
const DEFAULT_MAX_RETRY_DELAY_MS: i64 = 5_000;

fn clamp(value: i64, lo: i64, hi: i64) -> i64 {
    value.clamp(lo, hi)
}

/// A profile after defaulting and clamping (spec §4.5 step 2).
#[derive(Debug, Clone)]
struct NormalizedProfile {
    id: String,
    llm_base: Option<String>,
    llm_key: Option<String>,
    model: String,
    role: String,
    timeout_ms: u64,
    #[allow(dead_code)]
    retry_max_attempts: u32,
    #[allow(dead_code)]
    max_retry_delay_ms: u64,
}

fn normalize(profile: LlmProfileConfig, fallback_id: &str) -> NormalizedProfile {
    NormalizedProfile {
        id: profile.id.unwrap_or_else(|| fallback_id.to_string()),
        llm_base: profile.llm_base,
        llm_key: profile.llm_key,
        model: profile.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        role: profile.role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        timeout_ms: clamp(
            profile.llm_timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            1_000,
            300_000,
        ) as u64,
        retry_max_attempts: clamp(
            profile.llm_retry_max_attempts.unwrap_or(DEFAULT_RETRY_MAX_ATTEMPTS),
            0,
            6,
        ) as u32,
        max_retry_delay_ms: clamp(
            profile.llm_max_retry_delay_ms.unwrap_or(DEFAULT_MAX_RETRY_DELAY_MS),
            0,
            300_000,
        ) as u64,
    }
}

fn collect_profiles(config: &LlmConfigDocument) -> Vec<NormalizedProfile> {
    match config.llm_profiles.clone() {
        Some(field) => field
            .into_profiles()
            .into_iter()
            .enumerate()
            .map(|(i, profile)| normalize(profile, &format!("profile-{i}")))
            .collect(),
        None if config.llm_base.is_some() || config.llm_key.is_some() => {
            vec![normalize(
                LlmProfileConfig {
                    id: Some("default".to_string()),
                    llm_base: config.llm_base.clone(),
                    llm_key: config.llm_key.clone(),
                    model: config.llm_model.clone(),
                    role: None,
                    llm_timeout_ms: config.llm_timeout_ms,
                    llm_retry_max_attempts: config.llm_retry_max_attempts,
                    llm_max_retry_delay_ms: config.llm_max_retry_delay_ms,
                },
                "default",
            )]
        }
        None => Vec::new(),
    }
}

fn pick<'a>(profiles: &'a [NormalizedProfile], requested: Option<&str>) -> Result<&'a NormalizedProfile> {
    if profiles.is_empty() {
        return error::ProfileNotFoundSnafu.fail();
    }
    if let Some(requested) = requested {
        if let Some(found) = profiles.iter().find(|p| p.id == requested) {
            return Ok(found);
        }
    }
    if let Some(found) = profiles.iter().find(|p| p.id == "default") {
        return Ok(found);
    }
    Ok(&profiles[0])
}

/// Input to [`resolve_llm_route`].
pub struct ResolveLlmRouteInput<'a> {
    pub config: &'a LlmConfigDocument,
    pub profile: Option<&'a str>,
    pub role: Option<&'a str>,
}

/// Output of [`resolve_llm_route`].
pub struct ResolvedLlmRoute {
    pub route: LlmRoute,
    pub ordered_profiles: Vec<String>,
    pub escalation_policy: EscalationPolicy,
}

/// Resolve a concrete, routable `LlmRoute` plus its escalation chain
/// (spec §4.5).
pub fn resolve_llm_route(input: ResolveLlmRouteInput<'_>) -> Result<ResolvedLlmRoute> {
    let profiles = collect_profiles(input.config);
    let selected = pick(&profiles, input.profile)?;

    let llm_base = selected
        .llm_base
        .clone()
        .filter(|base| !base.trim().is_empty())
        .ok_or_else(|| error::MissingLlmConfigSnafu.build())?;
    let llm_key = selected
        .llm_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| error::MissingLlmConfigSnafu.build())?;

    let role = input.role.unwrap_or(&selected.role);
    let mut ordered_profiles: Vec<String> = match input.config.llm_profile_chains.get(role) {
        Some(chain) => chain
            .iter()
            .filter(|id| profiles.iter().any(|p| &p.id == *id))
            .cloned()
            .collect(),
        None => profiles
            .iter()
            .filter(|p| p.role == role)
            .map(|p| p.id.clone())
            .collect(),
    };
    if !ordered_profiles.iter().any(|id| id == &selected.id) {
        ordered_profiles.insert(0, selected.id.clone());
    }
    if ordered_profiles.is_empty() {
        ordered_profiles = vec![selected.id.clone()];
    }

    let escalation_policy = EscalationPolicy::normalize(input.config.escalation_policy.as_deref());

    Ok(ResolvedLlmRoute {
        route: LlmRoute {
            provider_id: "openai_compatible".to_string(),
            base_url: llm_base,
            api_key: llm_key,
            model: selected.model.clone(),
            timeout_ms: selected.timeout_ms,
        },
        ordered_profiles,
        escalation_policy,
    })
}

#[cfg(test)]
#[path = "resolver.test.rs"]
mod tests;
