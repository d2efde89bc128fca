//! Priority-ordered, per-hook registry and sequential invocation (spec §4.1).

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde_json::Value;

use crate::action::HookAction;
use crate::action::HookHandler;
use crate::merge::shallow_merge;
use crate::result::HookError;
use crate::result::RunResult;

struct Entry {
    id: String,
    priority: i32,
    seq: u64,
    handler: Arc<dyn HookHandler>,
}

/// Registration options for [`HookRunner::on`].
#[derive(Default)]
pub struct OnOptions {
    pub id: Option<String>,
    pub priority: Option<i32>,
}

/// Call to remove the handler it was returned for.
pub struct Unregister {
    hook: String,
    id: String,
    registry: Arc<Mutex<HashMap<String, Vec<Entry>>>>,
}

impl Unregister {
    pub fn call(self) {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entries) = registry.get_mut(&self.hook) {
            entries.retain(|entry| entry.id != self.id);
        }
    }
}

/// Registry of named hooks, each a priority-ordered chain of handlers.
///
/// Handlers for a given hook are sorted by priority descending, then by
/// registration order ascending, and run() awaits each in turn — never
/// concurrently, so a `Block` from handler N truly prevents handler N+1
/// from seeing the value at all.
pub struct HookRunner {
    entries: Arc<Mutex<HashMap<String, Vec<Entry>>>>,
    seq: AtomicU64,
}

impl HookRunner {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            seq: AtomicU64::new(0),
        }
    }

    /// Register `handler` under `hook`, returning a token that unregisters
    /// it when called.
    pub fn on(&self, hook: &str, handler: Arc<dyn HookHandler>, opts: OnOptions) -> Unregister {
        let id = opts.id.unwrap_or_else(|| talon_ids::random_id(12));
        let priority = opts.priority.unwrap_or(0);
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let bucket = entries.entry(hook.to_string()).or_default();
        bucket.push(Entry {
            id: id.clone(),
            priority,
            seq,
            handler,
        });
        bucket.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.seq.cmp(&b.seq)));

        Unregister {
            hook: hook.to_string(),
            id,
            registry: Arc::clone(&self.entries),
        }
    }

    /// Remove a single handler by hook name and registration id.
    pub fn off(&self, hook: &str, id: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bucket) = entries.get_mut(hook) {
            bucket.retain(|entry| entry.id != id);
        }
    }

    /// Run every handler registered for `hook` in priority order, feeding
    /// each one the value produced by the previous, until one blocks or
    /// the chain is exhausted. Handler errors are captured, not fatal.
    pub async fn run(&self, hook: &str, initial: Value) -> RunResult {
        let snapshot: Vec<(String, Arc<dyn HookHandler>)> = {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries
                .get(hook)
                .map(|bucket| {
                    bucket
                        .iter()
                        .map(|entry| (entry.id.clone(), Arc::clone(&entry.handler)))
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut result = RunResult::passthrough(initial);
        for (id, handler) in snapshot {
            match handler.call(result.value.clone()).await {
                Ok(HookAction::Continue) => {}
                Ok(HookAction::Patch(delta)) => {
                    result.value = shallow_merge(result.value, delta);
                    result.patch_count += 1;
                }
                Ok(HookAction::Block(reason)) => {
                    result.blocked = true;
                    result.reason = Some(reason);
                    break;
                }
                Err(err) => {
                    result.errors.push(HookError {
                        hook: hook.to_string(),
                        hook_id: id,
                        message: err.to_string(),
                    });
                }
            }
        }
        result
    }
}

impl Default for HookRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "runner.test.rs"]
mod tests;
