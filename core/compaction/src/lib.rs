//! Compaction algorithm: cut-point selection, summary assembly, token
//! accounting (spec §4.8).
//!
//! Grounded on the teacher's `core/loop/src/compaction.rs`, cut down to the
//! single cut-point/summary algorithm the spec actually calls for — the
//! teacher's session-memory tier, micro-compact content replacement, and
//! compact-prompt builder live entirely in the orchestrator's surrounding
//! host, not in this engine.

mod cut_point;
mod draft;
mod micro;
mod should_compact;

pub use cut_point::CutPoint;
pub use cut_point::FindCutPointInput;
pub use cut_point::find_cut_point;
pub use draft::CompactionDraft;
pub use draft::prepare_compaction;
pub use micro::MicroCompactCandidate;
pub use micro::estimated_savings_tokens;
pub use micro::micro_compact_candidates;
pub use should_compact::CompactionTrigger;
pub use should_compact::ShouldCompactInput;
pub use should_compact::ShouldCompactResult;
pub use should_compact::should_compact;
