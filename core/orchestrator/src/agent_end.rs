//! `handleAgentEnd`: retry-vs-compaction ordering (spec §4.9.4).

use serde::Serialize;
use serde_json::json;
use talon_session::RunState;
use talon_types::BrainEventType;

use crate::Orchestrator;
use crate::compaction::CompactionReason;
use crate::error::Result;
use crate::hook_names;
use crate::to_value_or_null;

/// What finished the agent turn.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentEndError {
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Input to `handleAgentEnd`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentEndOutcome {
    pub error: Option<AgentEndError>,
    pub overflow: bool,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEndDecision {
    Retry { delay_ms: i64, reason: &'static str },
    Continue { reason: String },
    Done { reason: String },
}

const RETRYABLE_CODES: [&str; 4] = ["ETIMEDOUT", "ECONNRESET", "EAI_AGAIN", "ENETUNREACH"];
const RETRYABLE_MESSAGE_NEEDLES: [&str; 5] = ["timeout", "temporar", "unavailable", "rate limit", "network"];

/// Retryable iff `error ∧ ¬overflow ∧ (status ≥ 500 ∨ status ∈ {408, 429} ∨
/// code ∈ {...} ∨ message matches /timeout|temporar|unavailable|rate
/// limit|network/i)` (spec §4.9.4).
pub fn is_retryable(outcome: &AgentEndOutcome) -> bool {
    if outcome.overflow {
        return false;
    }
    let Some(error) = &outcome.error else {
        return false;
    };
    if let Some(status) = error.status {
        if status >= 500 || status == 408 || status == 429 {
            return true;
        }
    }
    if let Some(code) = &error.code {
        if RETRYABLE_CODES.contains(&code.as_str()) {
            return true;
        }
    }
    if let Some(message) = &error.message {
        let lower = message.to_lowercase();
        if RETRYABLE_MESSAGE_NEEDLES.iter().any(|needle| lower.contains(needle)) {
            return true;
        }
    }
    false
}

impl Orchestrator {
    /// Fixed order: `agent_end.before` hook → `stopped` short-circuit →
    /// retry evaluation → compaction evaluation → `agent_end.after` hook
    /// (spec §4.9.4, "the kernel's most load-bearing decision").
    pub async fn handle_agent_end(&self, state: &mut RunState, outcome: AgentEndOutcome) -> Result<AgentEndDecision> {
        let before = self.hooks.run(hook_names::AGENT_END_BEFORE, to_value_or_null(&outcome)).await;
        let decision = if before.blocked {
            AgentEndDecision::Done { reason: format!("agent_end.before blocked: {}", before.reason.unwrap_or_default()) }
        } else if state.stopped {
            AgentEndDecision::Done { reason: "stopped".to_string() }
        } else {
            self.settle_retry_then_compaction(state, &outcome).await?
        };

        let _ = self.hooks.run(hook_names::AGENT_END_AFTER, json!({"outcome": to_value_or_null(&outcome)})).await;

        Ok(decision)
    }

    async fn settle_retry_then_compaction(&self, state: &mut RunState, outcome: &AgentEndOutcome) -> Result<AgentEndDecision> {
        let retryable = is_retryable(outcome);

        if retryable && state.retry.attempt < state.retry.max_attempts {
            state.retry.attempt += 1;
            state.retry.active = true;
            let base = self.config().retry.base_delay_ms as i64;
            let cap = self.config().retry.cap_delay_ms as i64;
            let delay_ms = cap.min(base * 2i64.pow((state.retry.attempt - 1) as u32));
            state.retry.delay_ms = delay_ms;

            self.emit(
                &state.session_id.clone(),
                BrainEventType::AutoRetryStart,
                json!({"attempt": state.retry.attempt, "delayMs": delay_ms}),
            )
            .await;
            return Ok(AgentEndDecision::Retry { delay_ms, reason: "retryable_error" });
        }

        if retryable {
            self.emit(&state.session_id.clone(), BrainEventType::AutoRetryEnd, json!({"success": false})).await;
            state.retry.active = false;
            state.retry.delay_ms = 0;
        } else if state.retry.active {
            self.emit(&state.session_id.clone(), BrainEventType::AutoRetryEnd, json!({"success": true})).await;
            state.retry.active = false;
            state.retry.attempt = 0;
            state.retry.delay_ms = 0;
        }

        let context = self.session_store_context(&state.session_id).await?;
        let should = talon_compaction::should_compact(talon_compaction::ShouldCompactInput {
            overflow: outcome.overflow,
            entries: &context.entries,
            previous_summary: &context.previous_summary,
            threshold_tokens: self.config().compaction.threshold_tokens as i64,
        });

        if should.should_compact {
            let reason = match should.reason {
                Some(talon_compaction::CompactionTrigger::Overflow) => CompactionReason::Overflow,
                Some(talon_compaction::CompactionTrigger::Threshold) => CompactionReason::Threshold,
                Some(talon_compaction::CompactionTrigger::Manual) | None => CompactionReason::Threshold,
            };
            let will_retry = matches!(reason, CompactionReason::Overflow);
            self.run_compaction(state, reason, will_retry).await?;
            return Ok(AgentEndDecision::Continue { reason: format!("compaction_{}", reason.as_str()) });
        }

        Ok(AgentEndDecision::Done { reason: if outcome.error.is_some() { "error".to_string() } else { "completed".to_string() } })
    }
}

#[cfg(test)]
#[path = "agent_end.test.rs"]
mod tests;
