//! Named LLM transport adapters and the profile resolver that turns
//! configuration into a concrete routed profile (spec §4.5).

mod error;
mod escalation;
mod openai_compatible;
mod registry;
mod resolver;

pub use error::LlmProviderError;
pub use error::Result;
pub use escalation::EscalationStep;
pub use escalation::EscalationWalker;
pub use openai_compatible::HttpSender;
pub use openai_compatible::OpenAiCompatibleAdapter;
pub use registry::LlmProviderRegistry;
pub use resolver::ResolveLlmRouteInput;
pub use resolver::ResolvedLlmRoute;
pub use resolver::resolve_llm_route;
