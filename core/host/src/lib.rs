//! External collaborator interfaces (spec §1, §6).
//!
//! Everything in this crate is a trait: the session store, the KV store,
//! the skill content loader, the verify adapter, the compaction summary
//! callback, the LLM transport, and concrete tool providers. The kernel
//! depends on these traits and never on a concrete filesystem, database,
//! or HTTP client — that wiring is the embedder's job.

mod clock;
mod compaction_summary;
mod error;
mod kv_store;
mod llm_transport;
mod session_store;
mod skill_content;
mod tool_provider;
mod verify;

pub use clock::Clock;
pub use clock::IdGenerator;
pub use clock::SystemClock;
pub use compaction_summary::CompactionSummarizer;
pub use compaction_summary::SummaryRequest;
pub use error::HostError;
pub use error::Result;
pub use kv_store::KvStore;
pub use llm_transport::LlmProviderAdapter;
pub use llm_transport::LlmRequest;
pub use llm_transport::LlmResponse;
pub use llm_transport::LlmRoute;
pub use session_store::CreateSessionInput;
pub use session_store::SessionHeader;
pub use session_store::SessionStore;
pub use session_store::trace_id_for;
pub use skill_content::SkillContentReader;
pub use tool_provider::StepToolProvider;
pub use verify::VerifyAdapter;
pub use verify::VerifyOutcome;
