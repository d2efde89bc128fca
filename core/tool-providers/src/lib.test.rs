use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use talon_host::Result as HostResult;
use talon_types::ExecuteStepInput;

use super::*;

struct StubProvider {
    id: &'static str,
    mode: Option<Mode>,
    priority: i32,
    accepts: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl StepToolProvider for StubProvider {
    fn id(&self) -> &str {
        self.id
    }

    fn mode(&self) -> Option<Mode> {
        self.mode
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_handle(&self, _input: &ExecuteStepInput) -> bool {
        self.accepts
    }

    async fn invoke(&self, _input: &ExecuteStepInput) -> HostResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"from": self.id}))
    }
}

fn input(mode: Option<Mode>, capability: Option<&str>) -> ExecuteStepInput {
    ExecuteStepInput {
        session_id: "s1".to_string(),
        mode,
        capability: capability.map(|c| c.to_string()),
        action: "do_thing".to_string(),
        args: None,
        verify_policy: None,
    }
}

#[test]
fn resolve_mode_prefers_explicit_mode_when_capability_has_providers() {
    let mut registry = ToolProviderRegistry::new();
    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "p1",
            mode: Some(Mode::Cdp),
            priority: 0,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );

    let resolved = registry.resolve_mode(&input(Some(Mode::Bridge), Some("browser.action")));
    assert_eq!(resolved, Some(Mode::Bridge));
}

#[test]
fn resolve_mode_falls_back_to_top_ranked_providers_mode() {
    let mut registry = ToolProviderRegistry::new();
    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "p1",
            mode: Some(Mode::Cdp),
            priority: 0,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );

    let resolved = registry.resolve_mode(&input(None, Some("browser.action")));
    assert_eq!(resolved, Some(Mode::Cdp));
}

#[tokio::test]
async fn invoke_picks_first_ranked_capability_provider_that_accepts() {
    let mut registry = ToolProviderRegistry::new();
    let low_calls = Arc::new(AtomicUsize::new(0));
    let high_calls = Arc::new(AtomicUsize::new(0));

    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "low",
            mode: Some(Mode::Script),
            priority: 0,
            accepts: true,
            calls: Arc::clone(&low_calls),
        }),
    );
    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "high",
            mode: Some(Mode::Cdp),
            priority: 10,
            accepts: true,
            calls: Arc::clone(&high_calls),
        }),
    );

    let outcome = registry
        .invoke(None, &input(None, Some("browser.action")))
        .await
        .unwrap_or_else(|e| panic!("invoke failed: {e}"));

    assert_eq!(outcome.provider_id, "high");
    assert_eq!(outcome.mode_used, Some(Mode::Cdp));
    assert_eq!(high_calls.load(Ordering::SeqCst), 1);
    assert_eq!(low_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invoke_skips_providers_that_do_not_accept() {
    let mut registry = ToolProviderRegistry::new();
    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "declines",
            mode: Some(Mode::Cdp),
            priority: 10,
            accepts: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );
    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "accepts",
            mode: Some(Mode::Script),
            priority: 0,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );

    let outcome = registry
        .invoke(None, &input(None, Some("browser.action")))
        .await
        .unwrap_or_else(|e| panic!("invoke failed: {e}"));

    assert_eq!(outcome.provider_id, "accepts");
}

#[tokio::test]
async fn invoke_fails_when_no_capability_provider_accepts() {
    let registry = ToolProviderRegistry::new();
    let err = registry
        .invoke(None, &input(None, Some("unknown.capability")))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolProviderError::CapabilityProviderNotFound { .. }));
}

#[tokio::test]
async fn invoke_by_mode_fails_when_adapter_missing() {
    let registry = ToolProviderRegistry::new();
    let err = registry.invoke(Some(Mode::Script), &input(Some(Mode::Script), None)).await.unwrap_err();
    assert!(matches!(err, ToolProviderError::ModeAdapterNotConfigured { .. }));
}

#[tokio::test]
async fn invoke_by_mode_succeeds_when_registered() {
    let mut registry = ToolProviderRegistry::new();
    registry.register_mode(
        Mode::Script,
        Arc::new(StubProvider {
            id: "script-provider",
            mode: Some(Mode::Script),
            priority: 0,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );

    let outcome = registry
        .invoke(Some(Mode::Script), &input(Some(Mode::Script), None))
        .await
        .unwrap_or_else(|e| panic!("invoke failed: {e}"));

    assert_eq!(outcome.provider_id, "script-provider");
    assert_eq!(outcome.mode_used, Some(Mode::Script));
    assert!(outcome.capability_used.is_none());
}

#[test]
fn unregister_mode_clears_the_slot() {
    let mut registry = ToolProviderRegistry::new();
    registry.register_mode(
        Mode::Script,
        Arc::new(StubProvider {
            id: "script-provider",
            mode: Some(Mode::Script),
            priority: 0,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );

    assert!(registry.get_mode(Mode::Script).is_some());
    let removed = registry.unregister_mode(Mode::Script);
    assert_eq!(removed.map(|p| p.id().to_string()), Some("script-provider".to_string()));
    assert!(registry.get_mode(Mode::Script).is_none());
}

#[test]
fn unregister_capability_removes_only_the_named_provider() {
    let mut registry = ToolProviderRegistry::new();
    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "keep",
            mode: Some(Mode::Script),
            priority: 0,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );
    registry.register_capability(
        "browser.action",
        Arc::new(StubProvider {
            id: "drop",
            mode: Some(Mode::Cdp),
            priority: 5,
            accepts: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }),
    );

    registry.unregister_capability("browser.action", "drop");
    assert_eq!(registry.capability_provider_ids("browser.action"), vec!["keep".to_string()]);
}
