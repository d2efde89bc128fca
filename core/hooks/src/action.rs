//! What a single hook handler can decide (spec §4.1).

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// A handler's decision for one invocation.
#[derive(Debug, Clone)]
pub enum HookAction {
    /// Carry the current value forward unchanged.
    Continue,
    /// Shallow-merge `delta` into the current value.
    Patch(Value),
    /// Short-circuit the chain; later handlers are not invoked.
    Block(String),
}

/// Error raised by a handler. Captured into [`RunResult::errors`] rather
/// than aborting the chain — "one bad hook cannot break the chain" (spec
/// §4.1).
#[derive(Debug, Clone)]
pub struct HookHandlerError(pub String);

impl fmt::Display for HookHandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for HookHandlerError {}

impl From<String> for HookHandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HookHandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// A registered hook handler. Handlers may be asynchronous; the runner
/// awaits each in sequence (spec §4.1).
#[async_trait]
pub trait HookHandler: Send + Sync {
    async fn call(&self, value: Value) -> Result<HookAction, HookHandlerError>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> HookHandler for FnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HookAction, HookHandlerError>> + Send + 'static,
{
    async fn call(&self, value: Value) -> Result<HookAction, HookHandlerError> {
        (self.0)(value).await
    }
}

/// Wrap a plain async closure as a [`HookHandler`].
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn HookHandler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HookAction, HookHandlerError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

#[cfg(test)]
#[path = "action.test.rs"]
mod tests;
