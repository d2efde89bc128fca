//! Default `openai_compatible` transport adapter (spec §4.5).
//!
//! Actual network I/O is a Non-goal (spec §1 "no transport
//! implementation"); this adapter only knows the OpenAI-compatible URL
//! convention and delegates the call itself to an injected
//! [`HttpSender`], the same pattern `core/host`'s other collaborator
//! traits use.

use async_trait::async_trait;
use std::sync::Arc;
use talon_host::LlmProviderAdapter;
use talon_host::LlmRequest;
use talon_host::LlmResponse;
use talon_host::LlmRoute;
use talon_host::Result as HostResult;
use tokio_util::sync::CancellationToken;

/// The actual HTTP call, injected by the host.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(
        &self,
        url: &str,
        request: &LlmRequest,
        cancel: CancellationToken,
    ) -> HostResult<LlmResponse>;
}

pub struct OpenAiCompatibleAdapter {
    http: Arc<dyn HttpSender>,
}

impl OpenAiCompatibleAdapter {
    pub fn new(http: Arc<dyn HttpSender>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl LlmProviderAdapter for OpenAiCompatibleAdapter {
    fn id(&self) -> &str {
        "openai_compatible"
    }

    fn resolve_request_url(&self, route: &LlmRoute) -> String {
        format!("{}/chat/completions", route.base_url.trim_end_matches('/'))
    }

    async fn send(&self, request: LlmRequest, cancel: CancellationToken) -> HostResult<LlmResponse> {
        let url = request
            .request_url
            .clone()
            .unwrap_or_else(|| self.resolve_request_url(&request.route));
        self.http.send(&url, &request, cancel).await
    }
}

#[cfg(test)]
#[path = "openai_compatible.test.rs"]
mod tests;
