//! Per-capability execution policy: builtins seeded for the core
//! capabilities, overrides layered on top (spec §4.4).
//!
//! Grounded on the same two-tier builtin/override idiom as
//! `talon-tool-contracts`, since the spec describes an identical
//! shape — this crate just resolves a different value type.

use std::collections::BTreeMap;

use talon_types::CapabilityExecutionPolicy;
use talon_types::LeasePolicy;
use talon_types::VerifyPolicy;

/// Where a resolved policy entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    Builtin,
    Override,
}

/// A single policy lookup result.
#[derive(Debug, Clone)]
pub struct PolicyEntry {
    pub capability: String,
    pub source: PolicySource,
    pub id: String,
    pub policy: CapabilityExecutionPolicy,
}

struct OverrideEntry {
    id: String,
    policy: CapabilityExecutionPolicy,
}

/// Registry of capability execution policies.
pub struct CapabilityPolicyRegistry {
    builtins: BTreeMap<String, CapabilityExecutionPolicy>,
    overrides: BTreeMap<String, OverrideEntry>,
}

fn browser_policy() -> CapabilityExecutionPolicy {
    CapabilityExecutionPolicy {
        fallback_mode: None,
        default_verify_policy: Some(VerifyPolicy::OnCritical),
        lease_policy: Some(LeasePolicy::Auto),
        allow_script_fallback: Some(true),
    }
}

fn fs_policy() -> CapabilityExecutionPolicy {
    CapabilityExecutionPolicy {
        fallback_mode: None,
        default_verify_policy: Some(VerifyPolicy::Off),
        lease_policy: Some(LeasePolicy::None),
        allow_script_fallback: Some(false),
    }
}

fn process_exec_policy() -> CapabilityExecutionPolicy {
    CapabilityExecutionPolicy {
        fallback_mode: None,
        default_verify_policy: Some(VerifyPolicy::OnCritical),
        lease_policy: Some(LeasePolicy::Required),
        allow_script_fallback: Some(false),
    }
}

impl CapabilityPolicyRegistry {
    /// Build a registry seeded with the spec's builtin table:
    /// `process.exec`, `fs.{read,write,edit}`, `browser.{snapshot,action,verify}`.
    pub fn with_builtins() -> Self {
        let mut builtins = BTreeMap::new();
        builtins.insert("process.exec".to_string(), process_exec_policy());
        for cap in ["fs.read", "fs.write", "fs.edit"] {
            builtins.insert(cap.to_string(), fs_policy());
        }
        for cap in ["browser.snapshot", "browser.action", "browser.verify"] {
            builtins.insert(cap.to_string(), browser_policy());
        }
        Self {
            builtins,
            overrides: BTreeMap::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            builtins: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }

    /// Register or replace an override for `capability`, returning the
    /// previous override (if any) so callers (the plugin runtime) can
    /// restore it later.
    pub fn set_override(
        &mut self,
        capability: &str,
        id: impl Into<String>,
        policy: CapabilityExecutionPolicy,
    ) -> Option<CapabilityExecutionPolicy> {
        let previous = self.overrides.remove(capability).map(|entry| entry.policy);
        self.overrides.insert(
            capability.to_string(),
            OverrideEntry { id: id.into(), policy },
        );
        previous
    }

    /// Remove an override, returning it.
    pub fn clear_override(&mut self, capability: &str) -> Option<CapabilityExecutionPolicy> {
        self.overrides.remove(capability).map(|entry| entry.policy)
    }

    /// Look up the raw entry for `capability` — override if present, else
    /// builtin, else `None`.
    pub fn get(&self, capability: &str) -> Option<PolicyEntry> {
        if let Some(entry) = self.overrides.get(capability) {
            return Some(PolicyEntry {
                capability: capability.to_string(),
                source: PolicySource::Override,
                id: entry.id.clone(),
                policy: entry.policy.clone(),
            });
        }
        self.builtins.get(capability).map(|policy| PolicyEntry {
            capability: capability.to_string(),
            source: PolicySource::Builtin,
            id: "builtin".to_string(),
            policy: policy.clone(),
        })
    }

    /// Merge builtin and override field-by-field, override fields winning
    /// when present. Missing on both sides is `None`.
    pub fn resolve(&self, capability: &str) -> CapabilityExecutionPolicy {
        let builtin = self.builtins.get(capability).cloned().unwrap_or_default();
        match self.overrides.get(capability) {
            Some(entry) => builtin.merged_with(&entry.policy),
            None => builtin,
        }
    }
}

impl Default for CapabilityPolicyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
