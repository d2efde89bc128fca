//! Plugin manifest: `{id, name, version, timeoutMs?, permissions}` (spec §4.7).

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

const DEFAULT_TIMEOUT_MS: u64 = 1500;
const MIN_TIMEOUT_MS: u64 = 50;
const MAX_TIMEOUT_MS: u64 = 10_000;

/// Wildcard permission entry granting every key in its category.
const WILDCARD: &str = "*";

fn allows(granted: &Option<BTreeSet<String>>, key: &str) -> bool {
    match granted {
        None => false,
        Some(items) => items.contains(WILDCARD) || items.contains(key),
    }
}

/// `{hooks?, modes?, capabilities?, replaceProviders?}`. Each list may
/// contain the wildcard `"*"`. An absent list grants nothing in that
/// category — a plugin must declare what it needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginPermissions {
    #[serde(default)]
    pub hooks: Option<BTreeSet<String>>,
    #[serde(default)]
    pub modes: Option<BTreeSet<String>>,
    #[serde(default)]
    pub capabilities: Option<BTreeSet<String>>,
    #[serde(default, rename = "replaceProviders")]
    pub replace_providers: bool,
}

impl PluginPermissions {
    pub fn allows_hook(&self, hook: &str) -> bool {
        allows(&self.hooks, hook)
    }

    pub fn allows_mode(&self, mode: &str) -> bool {
        allows(&self.modes, mode)
    }

    pub fn allows_capability(&self, capability: &str) -> bool {
        allows(&self.capabilities, capability)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default, rename = "timeoutMs")]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub permissions: PluginPermissions,
}

impl PluginManifest {
    /// The hook-wrapper timeout, clamped to `[50, 10_000]`ms, defaulting
    /// to 1500ms when unset.
    pub fn timeout(&self) -> Duration {
        let ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS).clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
#[path = "manifest.test.rs"]
mod tests;
