//! Step execution types (spec §3 "ExecuteStepInput/Result", §4.9.1).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::SessionId;
use crate::capability_policy::VerifyPolicy;

/// How a step is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Script,
    Cdp,
    Bridge,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Cdp => "cdp",
            Self::Bridge => "bridge",
        }
    }
}

/// Why (or whether) a step's result was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyReason {
    Verified,
    VerifyFailed,
    VerifyPolicyOff,
    VerifyAdapterMissing,
    VerifySkipped,
}

impl VerifyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::VerifyFailed => "verify_failed",
            Self::VerifyPolicyOff => "verify_policy_off",
            Self::VerifyAdapterMissing => "verify_adapter_missing",
            Self::VerifySkipped => "verify_skipped",
        }
    }
}

/// Input to `executeStep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteStepInput {
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_policy: Option<VerifyPolicy>,
}

impl ExecuteStepInput {
    /// `true` if `action` contains any of the critical-action substrings
    /// `navigate`, `click`, `type`, `fill`, `select`, `write`, case
    /// insensitively (spec §4.9.1 `shouldVerify`).
    pub fn is_critical_action(&self) -> bool {
        const CRITICAL: [&str; 6] = ["navigate", "click", "type", "fill", "select", "write"];
        let lower = self.action.to_lowercase();
        CRITICAL.iter().any(|needle| lower.contains(needle))
    }
}

/// Output of `executeStep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteStepResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_used: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_from: Option<Mode>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_reason: Option<VerifyReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl ExecuteStepResult {
    /// A failing result carrying only an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            mode_used: None,
            capability_used: None,
            fallback_from: None,
            verified: false,
            verify_reason: None,
            data: None,
            error: Some(error.into()),
            error_code: None,
            error_details: None,
            retryable: None,
        }
    }
}

#[cfg(test)]
#[path = "step.test.rs"]
mod tests;
