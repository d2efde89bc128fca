//! The concrete tool provider collaborator (spec §1, §3 "StepToolProvider").
//!
//! Concrete tool implementations (shell, filesystem, browser automation)
//! live behind this trait; the kernel never talks to a shell or a browser
//! directly.

use async_trait::async_trait;
use serde_json::Value;
use talon_types::ExecuteStepInput;
use talon_types::Mode;

use crate::error::Result;

/// A single provider bound to either a `mode` or one or more capabilities.
#[async_trait]
pub trait StepToolProvider: Send + Sync {
    /// Stable identifier, used in error messages and trace payloads.
    fn id(&self) -> &str;

    /// The mode this provider is bound to, if any.
    fn mode(&self) -> Option<Mode> {
        None
    }

    /// Ranking among providers bound to the same capability. Higher runs
    /// first; ties broken by registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this provider accepts `input`. `None` (the default) means
    /// "always accepts".
    fn can_handle(&self, _input: &ExecuteStepInput) -> bool {
        true
    }

    async fn invoke(&self, input: &ExecuteStepInput) -> Result<Value>;
}
