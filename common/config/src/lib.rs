//! Plain `serde`-deserialisable configuration types: LLM profiles,
//! escalation chains, and kernel-wide tunables (compaction thresholds,
//! trace ring/chunk sizes, retry base/cap).
//!
//! No filesystem access lives here — the host owns where the document
//! comes from and hands the kernel an already-parsed value, following the
//! teacher's layered `models.json`/`providers.json`/`profiles.json` naming
//! but collapsed into the single document this kernel actually needs.

mod kernel;
mod llm_profile;

pub use kernel::CompactionConfig;
pub use kernel::KernelConfig;
pub use kernel::RetryConfig;
pub use kernel::TraceConfig;
pub use llm_profile::EscalationPolicy;
pub use llm_profile::LlmConfigDocument;
pub use llm_profile::LlmProfileChains;
pub use llm_profile::LlmProfileConfig;
pub use llm_profile::LlmProfilesField;
