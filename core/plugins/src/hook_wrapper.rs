//! The hook-wrapper timeout race (spec §4.7): timeouts and handler errors
//! are swallowed to `continue` and recorded on the plugin's error state
//! rather than propagated through the hook chain.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use talon_hooks::HookAction;
use talon_hooks::HookHandler;
use talon_hooks::HookHandlerError;

/// `errorCount`/`lastError` bookkeeping for one enabled plugin, shared via
/// `Arc` so the wrapper can update it long after `enable` returns.
#[derive(Default)]
pub struct PluginErrorState {
    error_count: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl PluginErrorState {
    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, message: String) {
        self.error_count.fetch_add(1, Ordering::SeqCst);
        *self.last_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(message);
    }
}

pub struct PluginHookWrapper {
    inner: Arc<dyn HookHandler>,
    timeout: Duration,
    error_state: Arc<PluginErrorState>,
}

impl PluginHookWrapper {
    pub fn new(inner: Arc<dyn HookHandler>, timeout: Duration, error_state: Arc<PluginErrorState>) -> Self {
        Self { inner, timeout, error_state }
    }
}

#[async_trait]
impl HookHandler for PluginHookWrapper {
    async fn call(&self, value: Value) -> Result<HookAction, HookHandlerError> {
        match tokio::time::timeout(self.timeout, self.inner.call(value)).await {
            Ok(Ok(action)) => Ok(action),
            Ok(Err(err)) => {
                self.error_state.record(err.to_string());
                Ok(HookAction::Continue)
            }
            Err(_) => {
                self.error_state.record("hook handler timed out".to_string());
                Ok(HookAction::Continue)
            }
        }
    }
}

#[cfg(test)]
#[path = "hook_wrapper.test.rs"]
mod tests;
