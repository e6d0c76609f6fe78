//! Structured results returned across the orchestrator boundary.
//!
//! Domain rejections (empty text, duplicate entry, missing approval, ...)
//! are values, not errors: every operation returns an outcome the
//! presentation layer can render directly. Hard `Err` returns are reserved
//! for infrastructure failures.

use serde::Serialize;
use vasari_core::{
    CostSummary, Draft, Entry, Platform, PublishLog, PublishReceipt, Validation,
};

/// Why an operation was rejected without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Submitted text was empty after trimming
    Empty,
    /// The user already ingested identical (normalized) text
    Duplicate,
    /// Unknown entry id
    EntryNotFound,
    /// Unknown draft id
    DraftNotFound,
    /// Draft is neither approved nor scheduled and force was not set
    ApprovalRequired,
    /// Draft content no longer passes validation
    InvalidDraft,
    /// No publisher registered for the draft's platform
    MissingPlatformClient,
    /// Another publish already holds the lock for this draft
    AlreadyPublishing,
    /// Rolling publish cap reached for the platform
    CapExceeded,
    /// No capture session is active for the user
    NoActiveSession,
    /// The undo log is empty for the user
    NothingToUndo,
    /// The most recent undo record has an unrecognized action type
    UnsupportedUndoAction,
}

/// Result of [`ingest_entry`](crate::Pipeline::ingest_entry).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// A new entry was stored
    Created(Entry),
    /// The submission was rejected; for duplicates the existing entry is
    /// attached for reference
    Rejected {
        /// Why
        reason: RejectReason,
        /// Existing entry on duplicate rejection
        existing: Option<Entry>,
    },
}

impl IngestOutcome {
    /// Whether an entry was created.
    pub fn is_created(&self) -> bool {
        matches!(self, IngestOutcome::Created(_))
    }
}

/// The summary used for drafting, with provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Summary text (LLM output or deterministic 300-char prefix)
    pub text: String,
    /// Provenance: mode, provider/model or fallback reason
    pub meta: serde_json::Value,
}

/// One draft produced by generation, with its validation verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedDraft {
    /// The stored pending draft
    pub draft: Draft,
    /// Validation of the stored content (always `ok` after the backstop)
    pub validation: Validation,
}

/// Result of [`generate_drafts`](crate::Pipeline::generate_drafts).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerateOutcome {
    /// Drafts were created (possibly via deterministic fallback)
    Generated {
        /// Summary shared by all platform drafts
        summary: Summary,
        /// One per requested platform
        drafts: Vec<GeneratedDraft>,
    },
    /// The entry id did not resolve
    Rejected {
        /// Why
        reason: RejectReason,
    },
}

/// Result of a status decision, schedule, edit, or regenerate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DraftOutcome {
    /// The draft the operation produced or updated
    Updated {
        /// Updated or newly created draft
        draft: Draft,
        /// Validation, for operations that revalidate content
        validation: Option<Validation>,
    },
    /// The operation did not apply
    Rejected {
        /// Why
        reason: RejectReason,
    },
}

impl DraftOutcome {
    /// The draft on success.
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            DraftOutcome::Updated { draft, .. } => Some(draft),
            DraftOutcome::Rejected { .. } => None,
        }
    }
}

/// Result of a publish attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// The platform accepted the content (or dry-run simulated it)
    Published {
        /// Draft that was published
        draft_id: i64,
        /// Its platform
        platform: Platform,
        /// Whether this was simulated
        dry_run: bool,
        /// Platform receipt
        receipt: PublishReceipt,
    },
    /// The platform client failed; logged, draft status unchanged
    Failed {
        /// Draft that was attempted
        draft_id: i64,
        /// Its platform
        platform: Platform,
        /// Whether this was a dry-run attempt
        dry_run: bool,
        /// Client error text
        error: String,
    },
    /// Precondition failure; nothing attempted, nothing logged
    Rejected {
        /// Draft in question, when known
        draft_id: Option<i64>,
        /// Its platform, when known
        platform: Option<Platform>,
        /// Why
        reason: RejectReason,
        /// Validation detail for invalid-draft rejections
        validation: Option<Validation>,
    },
}

impl PublishOutcome {
    /// Whether the content reached the platform (or dry-run succeeded).
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }
}

/// Result of publishing the approved queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueOutcome {
    /// Per-draft outcomes, in queue order
    pub results: Vec<PublishOutcome>,
}

/// Result of one scheduler sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepOutcome {
    /// Number of due drafts attempted
    pub count: usize,
    /// Per-draft outcomes, in due order
    pub results: Vec<PublishOutcome>,
}

/// Result of [`undo_last_action`](crate::Pipeline::undo_last_action).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UndoOutcome {
    /// The most recent action was reverted
    Undone {
        /// Action type that was reverted
        action: String,
    },
    /// Nothing was reverted; the log is untouched
    Rejected {
        /// Why
        reason: RejectReason,
        /// Action type for unsupported records
        action: Option<String>,
    },
}

/// Deployment status for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    /// Effective dry-run flag (global override or static config)
    pub dry_run: bool,
    /// Aggregated generation spend
    pub costs: CostSummary,
    /// Most recent publish attempt
    pub last_publish: Option<PublishLog>,
}
