use std::sync::Arc;

use talon_host::LlmProviderAdapter;
use talon_host::LlmRequest;
use talon_host::LlmResponse;
use talon_host::Result as HostResult;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::openai_compatible::HttpSender;

struct NoopHttp;

#[async_trait::async_trait]
impl HttpSender for NoopHttp {
    async fn send(&self, _url: &str, _request: &LlmRequest, _cancel: CancellationToken) -> HostResult<LlmResponse> {
        Ok(LlmResponse { status: 200, chunks: vec![] })
    }
}

#[test]
fn with_defaults_preinstalls_openai_compatible() {
    let registry = LlmProviderRegistry::with_defaults(Arc::new(NoopHttp));
    let adapter = registry.get("openai_compatible").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(adapter.id(), "openai_compatible");
}

#[test]
fn unknown_adapter_id_is_an_error() {
    let registry = LlmProviderRegistry::empty();
    assert!(registry.get("missing").is_err());
}

#[test]
fn unregister_removes_a_previously_registered_adapter() {
    let mut registry = LlmProviderRegistry::with_defaults(Arc::new(NoopHttp));
    assert!(registry.get("openai_compatible").is_ok());

    let removed = registry.unregister("openai_compatible");
    assert_eq!(removed.map(|a| a.id().to_string()), Some("openai_compatible".to_string()));
    assert!(registry.get("openai_compatible").is_err());
}
