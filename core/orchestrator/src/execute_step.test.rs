use std::sync::Arc;

use pretty_assertions::assert_eq;
use talon_hooks::HookAction;
use talon_hooks::OnOptions;
use talon_hooks::handler_fn;
use talon_types::CapabilityExecutionPolicy;
use talon_types::ExecuteStepInput;
use talon_types::Mode;
use talon_types::VerifyReason;

use crate::hook_names;
use crate::test_support::FakeStore;
use crate::test_support::FakeSummarizer;
use crate::test_support::FakeToolProvider;
use crate::test_support::FakeVerifyAdapter;
use crate::test_support::builder;

fn input(action: &str, mode: Option<Mode>) -> ExecuteStepInput {
    ExecuteStepInput {
        session_id: "s1".to_string(),
        mode,
        capability: None,
        action: action.to_string(),
        args: None,
        verify_policy: None,
    }
}

#[tokio::test]
async fn a_script_step_succeeds_when_a_script_provider_is_registered() {
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), None, Default::default());
    b.tool_providers.register_mode(Mode::Script, Arc::new(FakeToolProvider::ok("script-provider", Mode::Script)));
    let (_hooks, orchestrator) = b.build();

    let result = orchestrator.execute_step(input("read_file", Some(Mode::Script))).await;

    assert!(result.ok);
    assert_eq!(result.mode_used, Some(Mode::Script));
    assert_eq!(result.fallback_from, None);
}

#[tokio::test]
async fn an_unbound_script_failure_falls_back_to_cdp() {
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), None, Default::default());
    b.tool_providers.register_mode(Mode::Script, Arc::new(FakeToolProvider::failing("script-provider", Mode::Script)));
    b.tool_providers.register_mode(Mode::Cdp, Arc::new(FakeToolProvider::ok("cdp-provider", Mode::Cdp)));
    let (_hooks, orchestrator) = b.build();

    let result = orchestrator.execute_step(input("read_file", Some(Mode::Script))).await;

    assert!(result.ok);
    assert_eq!(result.mode_used, Some(Mode::Cdp));
    assert_eq!(result.fallback_from, Some(Mode::Script));
}

#[tokio::test]
async fn a_capability_bound_step_never_falls_back_across_modes() {
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), None, Default::default());
    b.tool_providers.register_capability("browser.action", Arc::new(FakeToolProvider::failing("browser-script", Mode::Script)));
    b.tool_providers.register_mode(Mode::Cdp, Arc::new(FakeToolProvider::ok("cdp-provider", Mode::Cdp)));
    let (_hooks, orchestrator) = b.build();

    let mut step = input("read_something", Some(Mode::Script));
    step.capability = Some("browser.action".to_string());

    let result = orchestrator.execute_step(step).await;

    assert!(!result.ok);
    assert_eq!(result.mode_used, Some(Mode::Script));
}

#[tokio::test]
async fn allow_script_fallback_false_suppresses_the_unbound_retry() {
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), None, Default::default());
    b.tool_providers.register_mode(Mode::Script, Arc::new(FakeToolProvider::failing("script-provider", Mode::Script)));
    b.tool_providers.register_mode(Mode::Cdp, Arc::new(FakeToolProvider::ok("cdp-provider", Mode::Cdp)));
    b.capability_policies.set_override(
        "script",
        "test-override",
        CapabilityExecutionPolicy { allow_script_fallback: Some(false), ..Default::default() },
    );
    let (_hooks, orchestrator) = b.build();

    let result = orchestrator.execute_step(input("read_file", Some(Mode::Script))).await;

    assert!(!result.ok);
    assert_eq!(result.mode_used, Some(Mode::Script));
    assert_eq!(result.fallback_from, None);
}

#[tokio::test]
async fn a_critical_action_with_no_verify_adapter_reports_verify_adapter_missing() {
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), None, Default::default());
    b.tool_providers.register_mode(Mode::Script, Arc::new(FakeToolProvider::ok("script-provider", Mode::Script)));
    let (_hooks, orchestrator) = b.build();

    let result = orchestrator.execute_step(input("navigate", Some(Mode::Script))).await;

    assert!(result.ok);
    assert!(!result.verified);
    assert_eq!(result.verify_reason, Some(VerifyReason::VerifyAdapterMissing));
}

#[tokio::test]
async fn a_critical_action_with_a_passing_verify_adapter_is_verified() {
    let verify = Arc::new(FakeVerifyAdapter { verified: true });
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), Some(verify), Default::default());
    b.tool_providers.register_mode(Mode::Script, Arc::new(FakeToolProvider::ok("script-provider", Mode::Script)));
    let (_hooks, orchestrator) = b.build();

    let result = orchestrator.execute_step(input("click", Some(Mode::Script))).await;

    assert!(result.ok);
    assert!(result.verified);
    assert_eq!(result.verify_reason, Some(VerifyReason::Verified));
}

#[tokio::test]
async fn a_non_critical_action_is_never_gated_by_verify() {
    let verify = Arc::new(FakeVerifyAdapter { verified: false });
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), Some(verify), Default::default());
    b.tool_providers.register_mode(Mode::Script, Arc::new(FakeToolProvider::ok("script-provider", Mode::Script)));
    let (_hooks, orchestrator) = b.build();

    let result = orchestrator.execute_step(input("read_something", Some(Mode::Script))).await;

    assert!(result.ok);
    assert_eq!(result.verify_reason, Some(VerifyReason::VerifyPolicyOff));
}

#[tokio::test]
async fn a_blocked_step_before_execute_hook_short_circuits_without_an_after_execute_call() {
    let mut b = builder(Arc::new(FakeStore::default()), Arc::new(FakeSummarizer::returning("s")), None, Default::default());
    b.tool_providers.register_mode(Mode::Script, Arc::new(FakeToolProvider::ok("script-provider", Mode::Script)));
    let (hooks, orchestrator) = b.build();

    hooks.on(
        hook_names::STEP_BEFORE_EXECUTE,
        handler_fn(|_value| async move { Ok(HookAction::Block("nope".to_string())) }),
        OnOptions::default(),
    );
    let after_ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let after_ran_clone = Arc::clone(&after_ran);
    hooks.on(
        hook_names::STEP_AFTER_EXECUTE,
        handler_fn(move |_value| {
            let after_ran = Arc::clone(&after_ran_clone);
            async move {
                after_ran.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(HookAction::Continue)
            }
        }),
        OnOptions::default(),
    );

    let result = orchestrator.execute_step(input("read_file", Some(Mode::Script))).await;

    assert!(!result.ok);
    assert!(result.error.unwrap_or_default().contains("step.before_execute blocked"));
    assert!(!after_ran.load(std::sync::atomic::Ordering::SeqCst));
}
