//! Draft lifecycle status enumeration.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a draft.
///
/// Transitions:
///
/// ```text
/// pending --approve--> approved --publish--> publishing --> published
/// pending --reject---> rejected
/// pending --edit/regenerate--> (old -> rejected, new draft pending)
/// approved --schedule--> scheduled --(due)--> publishing --> published
/// publishing --(client failure)--> prior status (approved/scheduled)
/// ```
///
/// `Publishing` is a short-lived lock state claimed with an atomic
/// conditional transition so two publish attempts cannot both reach the
/// platform client for the same draft.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    /// Awaiting a human decision
    Pending,
    /// Cleared for publication
    Approved,
    /// Superseded or declined; never reused
    Rejected,
    /// Approved with a future publish time
    Scheduled,
    /// Publish in flight (lock state)
    Publishing,
    /// Successfully delivered to the platform
    Published,
}

impl DraftStatus {
    /// Whether the status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, DraftStatus::Published | DraftStatus::Rejected)
    }
}
