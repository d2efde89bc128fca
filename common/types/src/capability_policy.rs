//! Capability execution policy type (spec §3, §4.4).

use serde::Deserialize;
use serde::Serialize;

use crate::step::Mode;

/// When to run the verify gate after a step executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyPolicy {
    Off,
    OnCritical,
    Always,
}

/// Coarse-grained mutual-exclusion hint carried by a policy. Enforcement
/// belongs to providers, not the kernel (spec GLOSSARY "Lease").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeasePolicy {
    Auto,
    Required,
    None,
}

/// Per-capability execution defaults. Builtins and overrides are merged
/// field-by-field with overrides shadowing builtins only where they are
/// `Some` (spec §4.4).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapabilityExecutionPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_verify_policy: Option<VerifyPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_policy: Option<LeasePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_script_fallback: Option<bool>,
}

impl CapabilityExecutionPolicy {
    /// Merge `override_` on top of `self` (the builtin), field by field,
    /// with `override_`'s `Some` fields winning.
    pub fn merged_with(&self, override_: &Self) -> Self {
        Self {
            fallback_mode: override_.fallback_mode.or(self.fallback_mode),
            default_verify_policy: override_
                .default_verify_policy
                .or(self.default_verify_policy),
            lease_policy: override_.lease_policy.or(self.lease_policy),
            allow_script_fallback: override_
                .allow_script_fallback
                .or(self.allow_script_fallback),
        }
    }
}

#[cfg(test)]
#[path = "capability_policy.test.rs"]
mod tests;
