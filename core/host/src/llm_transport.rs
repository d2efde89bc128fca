//! The LLM transport collaborator (spec §1, §6).
//!
//! Transport implementation is explicitly out of scope (spec Non-goals);
//! this crate only defines the seam a concrete adapter plugs into.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// A concrete, resolved LLM route: where to send the request and with
/// which credentials/model.
#[derive(Debug, Clone)]
pub struct LlmRoute {
    pub provider_id: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
}

/// Request payload handed to an adapter's `send`.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub route: LlmRoute,
    pub payload: Value,
    pub request_url: Option<String>,
}

/// A streaming HTTP response is represented abstractly as a sequence of
/// already-decoded JSON chunks; a concrete adapter is responsible for
/// turning SSE/byte-stream framing into this shape.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub status: u16,
    pub chunks: Vec<Value>,
}

/// A named transport adapter (spec §4.5).
#[async_trait]
pub trait LlmProviderAdapter: Send + Sync {
    fn id(&self) -> &str;

    /// Resolve the concrete URL a request against `route` should hit.
    fn resolve_request_url(&self, route: &LlmRoute) -> String;

    async fn send(&self, request: LlmRequest, cancel: CancellationToken) -> Result<LlmResponse>;
}
