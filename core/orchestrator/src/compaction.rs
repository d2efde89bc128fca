//! `runCompaction` and `preSendCompactionCheck` (spec §4.9.5; SUPPLEMENT
//! `preSendCompactionCheck`).

use serde_json::json;
use talon_compaction::FindCutPointInput;
use talon_compaction::ShouldCompactInput;
use talon_compaction::find_cut_point;
use talon_compaction::prepare_compaction;
use talon_compaction::should_compact;
use talon_host::SummaryRequest;
use talon_session::RunState;
use talon_types::BrainEventType;
use talon_types::CompactionDraftMeta;
use talon_types::EntryId;
use talon_types::SessionContext;
use talon_types::SessionId;

use crate::Orchestrator;
use crate::error;
use crate::error::Result;
use crate::hook_names;

/// Why a compaction ran. `Manual` covers a caller-initiated compaction;
/// `should_compact` itself never produces it (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionReason {
    Overflow,
    Threshold,
    Manual,
}

impl CompactionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overflow => "overflow",
            Self::Threshold => "threshold",
            Self::Manual => "manual",
        }
    }
}

/// Result of a completed compaction (spec §4.9.5).
#[derive(Debug, Clone)]
pub struct CompactionOutcome {
    pub entry_id: EntryId,
    pub tokens_before: i64,
    pub tokens_after: i64,
}

impl Orchestrator {
    pub(crate) async fn session_store_context(&self, session_id: &SessionId) -> Result<SessionContext> {
        self.session_store
            .build_session_context(session_id)
            .await
            .map_err(|source| error::SessionStoreSnafu { message: source.to_string() }.build())
    }

    /// `runCompaction` (spec §4.9.5): emits `auto_compaction_start`, sets
    /// `compacting=true`, builds the draft, runs `compaction.summary`
    /// (empty summary ⇒ error), appends the compaction entry, emits
    /// `session_compact`/`auto_compaction_end{success:true}`, and runs
    /// `compaction.after`. Any failure emits
    /// `auto_compaction_end{success:false}` and `compaction.error`, clears
    /// `compacting`, and re-raises.
    pub async fn run_compaction(&self, state: &mut RunState, reason: CompactionReason, will_retry: bool) -> Result<CompactionOutcome> {
        let session_id = state.session_id.clone();
        self.emit(&session_id, BrainEventType::AutoCompactionStart, json!({"reason": reason.as_str()})).await;
        state.set_compacting(true);

        let outcome = self.run_compaction_inner(&session_id, reason, will_retry).await;
        state.set_compacting(false);

        match outcome {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.emit(
                    &session_id,
                    BrainEventType::AutoCompactionEnd,
                    json!({"success": false, "errorMessage": err.to_string()}),
                )
                .await;
                let _ = self
                    .hooks
                    .run(hook_names::COMPACTION_ERROR, json!({"reason": reason.as_str(), "message": err.to_string()}))
                    .await;
                Err(err)
            }
        }
    }

    async fn run_compaction_inner(&self, session_id: &SessionId, reason: CompactionReason, will_retry: bool) -> Result<CompactionOutcome> {
        let context = self.session_store_context(session_id).await?;

        let before = self
            .hooks
            .run(hook_names::COMPACTION_BEFORE, json!({"reason": reason.as_str(), "willRetry": will_retry}))
            .await;
        if before.blocked {
            return error::SummaryBlockedSnafu { reason: before.reason.unwrap_or_default() }.fail();
        }

        let compaction_cfg = &self.config().compaction;
        let cut = find_cut_point(FindCutPointInput {
            entries: &context.entries,
            keep_tail: compaction_cfg.keep_tail,
            split_turn: compaction_cfg.split_turn,
        });
        let draft = prepare_compaction(&context.entries, &context.previous_summary, cut.cut_index, compaction_cfg.max_summary_chars);

        let summary_hook = self
            .hooks
            .run(
                hook_names::COMPACTION_SUMMARY,
                json!({"previousSummary": draft.previous_summary, "droppedEntryCount": draft.dropped_entries.len()}),
            )
            .await;
        if summary_hook.blocked {
            return error::SummaryBlockedSnafu { reason: summary_hook.reason.unwrap_or_default() }.fail();
        }

        let summary = self
            .summarizer
            .summarize(SummaryRequest {
                previous_summary: draft.previous_summary.clone(),
                dropped_entries: draft.dropped_entries.clone(),
            })
            .await
            .map_err(|source| error::SummaryFailedSnafu { message: source.to_string() }.build())?;
        if summary.trim().is_empty() {
            return error::EmptySummarySnafu.fail();
        }

        let meta = CompactionDraftMeta {
            first_kept_entry_id: draft.first_kept_entry_id.clone(),
            tokens_before: draft.tokens_before,
            tokens_after: draft.tokens_after,
        };
        let entry_id = self
            .session_store
            .append_compaction(session_id, reason.as_str(), &summary, meta)
            .await
            .map_err(|source| error::SessionStoreSnafu { message: source.to_string() }.build())?;

        self.emit(
            session_id,
            BrainEventType::SessionCompact,
            json!({
                "reason": reason.as_str(),
                "entryId": entry_id,
                "tokensBefore": draft.tokens_before,
                "tokensAfter": draft.tokens_after,
            }),
        )
        .await;
        self.emit(
            session_id,
            BrainEventType::AutoCompactionEnd,
            json!({"success": true, "tokensBefore": draft.tokens_before, "tokensAfter": draft.tokens_after}),
        )
        .await;
        let _ = self
            .hooks
            .run(hook_names::COMPACTION_AFTER, json!({"reason": reason.as_str(), "entryId": entry_id}))
            .await;

        Ok(CompactionOutcome { entry_id, tokens_before: draft.tokens_before, tokens_after: draft.tokens_after })
    }

    /// `preSendCompactionCheck` (named in §2's data-flow line; SUPPLEMENT):
    /// build the session context, evaluate `shouldCompact` with
    /// `overflow=false`, and run `runCompaction("threshold",
    /// willRetry=false)` if due — sharing `runCompaction` with
    /// `handleAgentEnd` rather than duplicating it. Returns whether
    /// compaction ran.
    pub async fn pre_send_compaction_check(&self, state: &mut RunState) -> Result<bool> {
        let _ = self.hooks.run(hook_names::COMPACTION_CHECK_BEFORE, json!({"sessionId": state.session_id})).await;

        let context = self.session_store_context(&state.session_id).await?;
        let decision = should_compact(ShouldCompactInput {
            overflow: false,
            entries: &context.entries,
            previous_summary: &context.previous_summary,
            threshold_tokens: self.config().compaction.threshold_tokens as i64,
        });

        let ran = if decision.should_compact {
            self.run_compaction(state, CompactionReason::Threshold, false).await?;
            true
        } else {
            false
        };

        let _ = self
            .hooks
            .run(hook_names::COMPACTION_CHECK_AFTER, json!({"sessionId": state.session_id, "ran": ran}))
            .await;
        Ok(ran)
    }
}

#[cfg(test)]
#[path = "compaction.test.rs"]
mod tests;
