use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;

struct StubHttp;

#[async_trait]
impl HttpSender for StubHttp {
    async fn send(
        &self,
        url: &str,
        _request: &LlmRequest,
        _cancel: CancellationToken,
    ) -> HostResult<LlmResponse> {
        Ok(LlmResponse { status: 200, chunks: vec![serde_json::json!({"url": url})] })
    }
}

fn route() -> LlmRoute {
    LlmRoute {
        provider_id: "openai_compatible".to_string(),
        base_url: "https://api.example.com/".to_string(),
        api_key: "key".to_string(),
        model: "gpt-5.3-codex".to_string(),
        timeout_ms: 30_000,
    }
}

#[test]
fn resolves_request_url_by_stripping_trailing_slash() {
    let adapter = OpenAiCompatibleAdapter::new(Arc::new(StubHttp));
    assert_eq!(adapter.resolve_request_url(&route()), "https://api.example.com/chat/completions");
}

#[tokio::test]
async fn send_delegates_to_the_injected_http_sender() {
    let adapter = OpenAiCompatibleAdapter::new(Arc::new(StubHttp));
    let response = adapter
        .send(
            LlmRequest { route: route(), payload: serde_json::json!({}), request_url: None },
            CancellationToken::new(),
        )
        .await
        .unwrap_or_else(|e| panic!("send failed: {e}"));
    assert_eq!(response.status, 200);
}
