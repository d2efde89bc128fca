//! `executeStep`: the step execution pipeline (spec §4.9.1).

use serde_json::Value;
use serde_json::json;
use talon_error::ErrorExt;
use talon_tool_providers::ToolProviderError;
use talon_types::ExecuteStepInput;
use talon_types::ExecuteStepResult;
use talon_types::Mode;
use talon_types::VerifyPolicy;
use talon_types::VerifyReason;

use crate::Orchestrator;
use crate::hook_names;
use crate::to_value_or_null;

struct StepAttempt {
    mode_used: Option<Mode>,
    capability_used: Option<String>,
    data: Option<Value>,
    error: Option<String>,
    error_code: Option<String>,
    error_details: Option<Value>,
    retryable: Option<bool>,
}

impl StepAttempt {
    fn ok(outcome: talon_tool_providers::InvokeOutcome) -> Self {
        Self {
            mode_used: outcome.mode_used,
            capability_used: outcome.capability_used,
            data: Some(outcome.data),
            error: None,
            error_code: None,
            error_details: None,
            retryable: None,
        }
    }

    fn err(mode_used: Option<Mode>, err: ToolProviderError) -> Self {
        Self {
            mode_used,
            capability_used: None,
            data: None,
            error: Some(err.to_string()),
            error_code: Some(err.status_code().as_ref().to_string()),
            error_details: None,
            retryable: Some(err.status_code().is_retryable()),
        }
    }
}

impl Orchestrator {
    /// Run one step through the full hook/invoke/verify pipeline (spec
    /// §4.9.1).
    pub async fn execute_step(&self, input: ExecuteStepInput) -> ExecuteStepResult {
        let before = self.hooks.run(hook_names::STEP_BEFORE_EXECUTE, to_value_or_null(&input)).await;
        if before.blocked {
            return ExecuteStepResult::failure(format!(
                "step.before_execute blocked: {}",
                before.reason.unwrap_or_default()
            ));
        }

        let patched_input: ExecuteStepInput = match serde_json::from_value(before.value) {
            Ok(patched) => patched,
            Err(err) => return ExecuteStepResult::failure(format!("malformed patched step input: {err}")),
        };

        let initial_mode = patched_input.mode;
        let resolved_mode = self.tool_providers.read().await.resolve_mode(&patched_input);
        let Some(resolved_mode) = resolved_mode else {
            let message = if patched_input.capability.is_some() {
                "no provider registered for capability"
            } else {
                "mode must be one of script/cdp/bridge"
            };
            return self.fail_through_after_execute(message.to_string()).await;
        };

        let before_call = self
            .hooks
            .run(
                hook_names::TOOL_BEFORE_CALL,
                json!({
                    "mode": resolved_mode,
                    "capability": patched_input.capability,
                    "input": to_value_or_null(&patched_input),
                }),
            )
            .await;
        if before_call.blocked {
            return self
                .fail_through_after_execute(format!(
                    "tool.before_call blocked: {}",
                    before_call.reason.unwrap_or_default()
                ))
                .await;
        }

        let attempt = self.invoke_with_fallback(&patched_input, resolved_mode).await;

        let after_result = self
            .hooks
            .run(
                hook_names::TOOL_AFTER_RESULT,
                json!({
                    "modeUsed": attempt.mode_used,
                    "capabilityUsed": attempt.capability_used,
                    "data": attempt.data,
                    "error": attempt.error,
                }),
            )
            .await;

        let mut ok = attempt.error.is_none();
        let mut error = attempt.error.clone();
        if after_result.blocked {
            ok = false;
            error = Some(format!("tool.after_result blocked: {}", after_result.reason.unwrap_or_default()));
        }

        let (verified, verify_reason) = if ok {
            self.run_verify_gate(&patched_input, attempt.mode_used, attempt.data.as_ref()).await
        } else {
            (false, VerifyReason::VerifySkipped)
        };

        let mut result = ExecuteStepResult {
            ok,
            mode_used: attempt.mode_used,
            capability_used: attempt.capability_used,
            fallback_from: if attempt.mode_used != initial_mode { initial_mode } else { None },
            verified,
            verify_reason: Some(verify_reason),
            data: attempt.data,
            error,
            error_code: attempt.error_code,
            error_details: attempt.error_details,
            retryable: attempt.retryable,
        };

        let after_execute = self.hooks.run(hook_names::STEP_AFTER_EXECUTE, to_value_or_null(&result)).await;
        if after_execute.blocked {
            result.ok = false;
            result.error = Some(format!("step.after_execute blocked: {}", after_execute.reason.unwrap_or_default()));
        }
        result
    }

    /// A synthesized failure still runs `step.after_execute` before being
    /// returned (spec §4.9.1 step 2/3/5).
    async fn fail_through_after_execute(&self, message: String) -> ExecuteStepResult {
        let mut result = ExecuteStepResult::failure(message);
        let after_execute = self.hooks.run(hook_names::STEP_AFTER_EXECUTE, to_value_or_null(&result)).await;
        if after_execute.blocked {
            result.error = Some(format!("step.after_execute blocked: {}", after_execute.reason.unwrap_or_default()));
        }
        result
    }

    /// Invoke the resolved provider; on failure, permit a single
    /// script→cdp retry under the v2 rule: only when the initial mode was
    /// `script` and no capability was explicitly bound (spec §4.9.1 open
    /// question, §9). An explicit `allowScriptFallback=false` policy
    /// override (keyed by the bound capability, or by `"script"` when
    /// unbound) suppresses the retry even then, per the design note on
    /// fallback-semantics drift (spec §9).
    async fn invoke_with_fallback(&self, input: &ExecuteStepInput, resolved_mode: Mode) -> StepAttempt {
        let first = self.tool_providers.read().await.invoke(Some(resolved_mode), input).await;
        match first {
            Ok(outcome) => StepAttempt::ok(outcome),
            Err(err) => {
                let policy_key = input.capability.as_deref().unwrap_or("script");
                let policy_allows = self.capability_policies.read().await.resolve(policy_key).allow_script_fallback != Some(false);
                let allow_fallback = input.capability.is_none() && resolved_mode == Mode::Script && policy_allows;
                if !allow_fallback {
                    return StepAttempt::err(Some(resolved_mode), err);
                }
                let mut fallback_input = input.clone();
                fallback_input.mode = Some(Mode::Cdp);
                let second = self.tool_providers.read().await.invoke(Some(Mode::Cdp), &fallback_input).await;
                match second {
                    Ok(outcome) => StepAttempt::ok(outcome),
                    Err(fallback_err) => StepAttempt::err(Some(Mode::Cdp), fallback_err),
                }
            }
        }
    }

    /// `shouldVerify`: `off` never requires verification, `always` always
    /// does, `on_critical` iff the action names a critical effect (spec
    /// §4.9.1 step 6). Defaults to `on_critical` when the step didn't name
    /// a policy.
    async fn run_verify_gate(&self, input: &ExecuteStepInput, mode_used: Option<Mode>, data: Option<&Value>) -> (bool, VerifyReason) {
        let policy = input.verify_policy.unwrap_or(VerifyPolicy::OnCritical);
        let required = match policy {
            VerifyPolicy::Off => false,
            VerifyPolicy::Always => true,
            VerifyPolicy::OnCritical => input.is_critical_action(),
        };
        if !required {
            return (false, VerifyReason::VerifyPolicyOff);
        }

        let Some(adapter) = &self.verify_adapter else {
            return (false, VerifyReason::VerifyAdapterMissing);
        };

        let mut verify_input = input.clone();
        verify_input.mode = mode_used;
        let outcome = adapter.verify(&verify_input, data).await;
        if outcome.verified {
            (true, VerifyReason::Verified)
        } else {
            (false, VerifyReason::VerifyFailed)
        }
    }
}

#[cfg(test)]
#[path = "execute_step.test.rs"]
mod tests;
