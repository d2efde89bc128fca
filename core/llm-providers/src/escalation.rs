//! Escalation chain walk (SPEC_FULL supplement), grounded on the teacher's
//! `core/loop/src/fallback.rs` `FallbackState`.

use talon_config::EscalationPolicy;

/// One escalation transition, the same shape as the teacher's
/// `FallbackAttempt` generalized from "model name" to "profile id".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationStep {
    pub from_profile: String,
    pub to_profile: String,
    pub reason: String,
}

/// Walks `ordered_profiles` one step per call, recording transitions.
/// `escalation_policy == Disabled` makes [`EscalationWalker::next`] always
/// return `None`.
pub struct EscalationWalker {
    ordered_profiles: Vec<String>,
    policy: EscalationPolicy,
    current_index: usize,
    history: Vec<EscalationStep>,
}

impl EscalationWalker {
    pub fn new(ordered_profiles: Vec<String>, policy: EscalationPolicy) -> Self {
        Self {
            ordered_profiles,
            policy,
            current_index: 0,
            history: Vec::new(),
        }
    }

    pub fn current_profile(&self) -> Option<&str> {
        self.ordered_profiles.get(self.current_index).map(String::as_str)
    }

    pub fn history(&self) -> &[EscalationStep] {
        &self.history
    }

    /// Advance to the next profile in the chain, if one exists and
    /// escalation is enabled.
    pub fn next(&mut self, reason: impl Into<String>) -> Option<&str> {
        if self.policy == EscalationPolicy::Disabled {
            return None;
        }
        let next_index = self.current_index + 1;
        let from = self.ordered_profiles.get(self.current_index)?.clone();
        let to = self.ordered_profiles.get(next_index)?.clone();

        self.history.push(EscalationStep {
            from_profile: from,
            to_profile: to,
            reason: reason.into(),
        });
        self.current_index = next_index;
        self.current_profile()
    }
}

#[cfg(test)]
#[path = "escalation.test.rs"]
mod tests;
