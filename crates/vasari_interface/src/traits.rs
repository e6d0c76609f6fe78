//! Trait definitions for the pipeline's external capabilities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use vasari_core::{
    CaptureSession, CostSummary, Draft, DraftStatus, Entry, GenerationRequest, GenerationResult,
    LlmCall, NewDraft, NewEntry, NewLlmCall, NewPublishLog, Platform, PublishLog, PublishReceipt,
    UndoAction, UndoPayload, UserState,
};
use vasari_error::VasariResult;

/// A generation vendor the router can call.
///
/// The router is agnostic to which vendors exist; it resolves providers by
/// name from a registry and tries them in route order.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for a bounded request.
    async fn generate(&self, request: &GenerationRequest) -> VasariResult<GenerationResult>;

    /// Provider name used in routing tables (e.g. "openai", "anthropic").
    fn name(&self) -> &'static str;
}

/// A platform the orchestrator can publish approved content to.
///
/// Dry-run publishes must never perform network I/O and must always succeed.
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// Deliver content to the platform, or simulate delivery in dry-run.
    async fn publish(&self, content: &str, dry_run: bool) -> VasariResult<PublishReceipt>;

    /// Which platform this publisher serves.
    fn platform(&self) -> Platform;
}

/// The persistence capability backing the orchestrator.
///
/// Implementations must uphold the schema invariants: `(user_id, text_hash)`
/// uniqueness for entries, entry deletion cascading to drafts, draft versions
/// assigned as `max(existing) + 1` per `(entry_id, platform)`, append-only
/// publish and call logs, and due-scheduled retrieval ordered by scheduled
/// time then id.
#[async_trait]
pub trait Store: Send + Sync {
    // -- entries ----------------------------------------------------------

    /// Persist a new entry. Fails with a duplicate error if the user
    /// already has an entry with the same hash.
    async fn create_entry(&self, new: NewEntry) -> VasariResult<Entry>;

    /// Fetch an entry by id.
    async fn entry(&self, id: i64) -> VasariResult<Option<Entry>>;

    /// Fetch a user's entry by normalized content hash.
    async fn entry_by_hash(&self, user_id: &str, text_hash: &str)
    -> VasariResult<Option<Entry>>;

    /// The user's most recently created entry.
    async fn latest_entry_for_user(&self, user_id: &str) -> VasariResult<Option<Entry>>;

    /// Delete an entry and, by cascade, all of its drafts. Returns whether
    /// anything was deleted.
    async fn delete_entry(&self, id: i64) -> VasariResult<bool>;

    // -- drafts -----------------------------------------------------------

    /// Persist a new draft, assigning the next version for its
    /// `(entry_id, platform)` pair.
    async fn create_draft(&self, new: NewDraft) -> VasariResult<Draft>;

    /// Fetch a draft by id.
    async fn draft(&self, id: i64) -> VasariResult<Option<Draft>>;

    /// Unconditionally set a draft's status and scheduled time. Returns the
    /// updated draft, or `None` if the id is unknown.
    async fn update_draft_status(
        &self,
        id: i64,
        status: DraftStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> VasariResult<Option<Draft>>;

    /// Atomic compare-and-set on a draft's status: the transition applies
    /// only if the current status is one of `expected`. Returns the updated
    /// draft, or `None` when the draft is missing or the comparison lost.
    /// The scheduled time is preserved.
    async fn transition_draft_status(
        &self,
        id: i64,
        expected: &[DraftStatus],
        to: DraftStatus,
    ) -> VasariResult<Option<Draft>>;

    /// Delete a draft. Returns whether anything was deleted.
    async fn delete_draft(&self, id: i64) -> VasariResult<bool>;

    /// All drafts for an entry, newest version first within each platform.
    async fn drafts_for_entry(&self, entry_id: i64) -> VasariResult<Vec<Draft>>;

    /// Pending drafts for a user, newest first.
    async fn pending_drafts(&self, user_id: &str, limit: usize) -> VasariResult<Vec<Draft>>;

    /// Approved drafts, optionally restricted to one user, newest first.
    async fn approved_drafts(&self, user_id: Option<&str>) -> VasariResult<Vec<Draft>>;

    /// Scheduled drafts due at or before `now`, ordered by scheduled time
    /// then id.
    async fn due_scheduled_drafts(&self, now: DateTime<Utc>) -> VasariResult<Vec<Draft>>;

    // -- publish log ------------------------------------------------------

    /// Append a publish attempt record.
    async fn record_publish(&self, new: NewPublishLog) -> VasariResult<PublishLog>;

    /// The most recent publish attempt, if any.
    async fn last_publish_attempt(&self) -> VasariResult<Option<PublishLog>>;

    /// Count successful publishes for a platform at or after `since`.
    async fn count_publish_successes_since(
        &self,
        platform: Platform,
        since: DateTime<Utc>,
    ) -> VasariResult<u64>;

    // -- llm call log -----------------------------------------------------

    /// Append a generation call record.
    async fn record_llm_call(&self, new: NewLlmCall) -> VasariResult<LlmCall>;

    /// Aggregate calls, tokens, and cost over the call log.
    async fn cost_summary(&self) -> VasariResult<CostSummary>;

    // -- global settings --------------------------------------------------

    /// Set a per-deployment override value.
    async fn set_global_setting(&self, key: &str, value: JsonValue) -> VasariResult<()>;

    /// Fetch a per-deployment override value.
    async fn global_setting(&self, key: &str) -> VasariResult<Option<JsonValue>>;

    // -- capture sessions -------------------------------------------------

    /// The user's active capture session, if any.
    async fn capture_session(&self, user_id: &str) -> VasariResult<Option<CaptureSession>>;

    /// Start (or reset) the user's capture session.
    async fn start_capture(&self, user_id: &str) -> VasariResult<CaptureSession>;

    /// Append a chunk to the active session. Returns `None` if no session
    /// is active.
    async fn append_capture(&self, user_id: &str, chunk: &str)
    -> VasariResult<Option<CaptureSession>>;

    /// Consume and delete the active session, returning it. Returns `None`
    /// if no session is active.
    async fn end_capture(&self, user_id: &str) -> VasariResult<Option<CaptureSession>>;

    // -- user state -------------------------------------------------------

    /// Set the user's awaiting-state tag and payload.
    async fn set_user_state(
        &self,
        user_id: &str,
        state: &str,
        data: JsonValue,
    ) -> VasariResult<UserState>;

    /// Fetch the user's awaiting-state, if set.
    async fn user_state(&self, user_id: &str) -> VasariResult<Option<UserState>>;

    /// Clear the user's awaiting-state.
    async fn clear_user_state(&self, user_id: &str) -> VasariResult<()>;

    // -- undo log ---------------------------------------------------------

    /// Append a reversible-action record.
    async fn record_undo(&self, user_id: &str, payload: &UndoPayload)
    -> VasariResult<UndoAction>;

    /// The most recent non-undone action for the user.
    async fn last_undo(&self, user_id: &str) -> VasariResult<Option<UndoAction>>;

    /// Mark an undo action as reverted.
    async fn mark_undo_done(&self, id: i64) -> VasariResult<()>;
}
