//! Persisted record types.
//!
//! These mirror the rows the store keeps: entries, versioned drafts, the
//! append-only publish and LLM call logs, capture sessions, user states,
//! and the undo log. `New*` companions carry the caller-supplied fields;
//! identifiers, timestamps, and versions are assigned by the store.

use crate::{DraftStatus, Platform};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One ingested unit of raw user text, deduplicated per user by content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identifier
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Raw text as submitted (trimmed)
    pub text: String,
    /// Normalized content hash, unique per user
    pub text_hash: String,
    /// Where the text came from (chat, file, ...)
    pub source: String,
    /// Caller-supplied intent flags (private/strict/draft/publish)
    pub flags: JsonValue,
}

/// Fields for creating an [`Entry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    /// Owning user
    pub user_id: String,
    /// Raw text (already trimmed by the orchestrator)
    pub text: String,
    /// Normalized content hash
    pub text_hash: String,
    /// Source label
    pub source: String,
    /// Intent flags
    pub flags: JsonValue,
}

/// A versioned, platform-specific rendering of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Store-assigned identifier
    pub id: i64,
    /// Parent entry
    pub entry_id: i64,
    /// Target platform
    pub platform: Platform,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Draft text
    pub content: String,
    /// Lifecycle status
    pub status: DraftStatus,
    /// Publish time for scheduled drafts
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Generation provenance, summary used, validation result
    pub meta: JsonValue,
    /// Monotonic version scoped to `(entry_id, platform)`
    pub version: i32,
}

/// Fields for creating a [`Draft`]. The store assigns id, timestamp, and
/// the next version number for the `(entry_id, platform)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDraft {
    /// Parent entry
    pub entry_id: i64,
    /// Target platform
    pub platform: Platform,
    /// Draft text
    pub content: String,
    /// Initial status
    pub status: DraftStatus,
    /// Publish time, if already scheduled
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Free-form metadata
    pub meta: JsonValue,
}

/// Append-only record of one publish attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishLog {
    /// Store-assigned identifier
    pub id: i64,
    /// Draft that was attempted
    pub draft_id: i64,
    /// Platform attempted
    pub platform: Platform,
    /// Attempt timestamp (UTC)
    pub attempted_at: DateTime<Utc>,
    /// Whether the platform accepted the content
    pub success: bool,
    /// Platform response payload (or simulated receipt)
    pub response: JsonValue,
    /// Error text on failure
    pub error: Option<String>,
}

/// Fields for recording a [`PublishLog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPublishLog {
    /// Draft that was attempted
    pub draft_id: i64,
    /// Platform attempted
    pub platform: Platform,
    /// Whether the attempt succeeded
    pub success: bool,
    /// Response payload
    pub response: JsonValue,
    /// Error text on failure
    pub error: Option<String>,
}

/// Append-only record of one successful generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmCall {
    /// Store-assigned identifier
    pub id: i64,
    /// Generation stage (summarize, draft_x, ...)
    pub stage: String,
    /// Provider that served the call
    pub provider: String,
    /// Model that served the call
    pub model: String,
    /// Prompt tokens
    pub tokens_in: u32,
    /// Completion tokens
    pub tokens_out: u32,
    /// Estimated cost in USD
    pub cost_usd: f64,
    /// Wall-clock latency
    pub latency_ms: u64,
    /// Record timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Caller-supplied metadata
    pub meta: JsonValue,
}

/// Fields for recording an [`LlmCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLlmCall {
    /// Generation stage
    pub stage: String,
    /// Provider name
    pub provider: String,
    /// Model name
    pub model: String,
    /// Prompt tokens
    pub tokens_in: u32,
    /// Completion tokens
    pub tokens_out: u32,
    /// Estimated cost in USD
    pub cost_usd: f64,
    /// Wall-clock latency
    pub latency_ms: u64,
    /// Caller-supplied metadata
    pub meta: JsonValue,
}

/// Aggregate over the LLM call log.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostSummary {
    /// Number of logged calls
    pub calls: u64,
    /// Total prompt tokens
    pub tokens_in: u64,
    /// Total completion tokens
    pub tokens_out: u64,
    /// Total estimated cost in USD
    pub cost_usd: f64,
}

/// Multi-message text buffer between a start and end signal.
///
/// At most one exists per user; ending the session consumes the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSession {
    /// Owning user
    pub user_id: String,
    /// When capture began (UTC)
    pub started_at: DateTime<Utc>,
    /// Accumulated text
    pub buffer: String,
}

/// Small awaiting-state tag routing the user's next free-text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    /// Owning user
    pub user_id: String,
    /// State tag (e.g. "awaiting_edit")
    pub state: String,
    /// Associated data (e.g. target draft id)
    pub data: JsonValue,
    /// Last update (UTC)
    pub updated_at: DateTime<Utc>,
}

/// Append-only record of a reversible operation.
///
/// The payload is stored as free-form JSON with an `action` discriminator
/// so rows written by other schema revisions survive in the log; the undo
/// handler dispatches on the action string and fails closed on action types
/// it does not recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoAction {
    /// Store-assigned identifier
    pub id: i64,
    /// Owning user
    pub user_id: String,
    /// Action discriminator (`entry_create`, `draft_create`, `draft_status_update`)
    pub action: String,
    /// Data sufficient to reverse the action
    pub payload: JsonValue,
    /// Record timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Whether the action has been reverted
    pub undone: bool,
}

/// Typed payloads for the supported undo actions.
///
/// Serializes with an `action` tag matching [`UndoAction::action`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UndoPayload {
    /// Reverse an entry creation by deleting the entry (drafts cascade).
    EntryCreate {
        /// Entry to delete
        entry_id: i64,
    },
    /// Reverse a draft creation by deleting the draft.
    DraftCreate {
        /// Draft to delete
        draft_id: i64,
    },
    /// Reverse a status transition by restoring the prior status and
    /// scheduled time.
    DraftStatusUpdate {
        /// Draft to restore
        draft_id: i64,
        /// Status before the transition
        previous_status: DraftStatus,
        /// Scheduled time before the transition
        previous_scheduled_at: Option<DateTime<Utc>>,
    },
}

impl UndoPayload {
    /// The action discriminator string for this payload.
    pub fn action(&self) -> &'static str {
        match self {
            UndoPayload::EntryCreate { .. } => "entry_create",
            UndoPayload::DraftCreate { .. } => "draft_create",
            UndoPayload::DraftStatusUpdate { .. } => "draft_status_update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_payload_tags_match_action() {
        let payload = UndoPayload::EntryCreate { entry_id: 4 };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["action"], payload.action());
        assert_eq!(value["entry_id"], 4);
    }

    #[test]
    fn undo_payload_round_trips() {
        let payload = UndoPayload::DraftStatusUpdate {
            draft_id: 9,
            previous_status: DraftStatus::Approved,
            previous_scheduled_at: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        let back: UndoPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back, payload);
    }
}
