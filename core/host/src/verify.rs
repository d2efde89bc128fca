//! The verify adapter collaborator (spec §4.9.1 step 6).

use async_trait::async_trait;
use serde_json::Value;
use talon_types::ExecuteStepInput;

/// Outcome of running an external verify adapter against a step's result.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub verified: bool,
    pub reason: Option<String>,
}

/// Confirms that a step's side effect actually took hold (e.g. a `click`
/// landed, a `navigate` reached the expected page). Called with the input
/// the step ran with — `mode` overridden to the mode that actually
/// executed — and the data the provider returned.
#[async_trait]
pub trait VerifyAdapter: Send + Sync {
    async fn verify(&self, input: &ExecuteStepInput, data: Option<&Value>) -> VerifyOutcome;
}
