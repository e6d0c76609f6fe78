//! Per-platform length validation and safe truncation.
//!
//! Lengths are character counts, not bytes, so multi-byte text is judged
//! the way platforms count it.

use serde::{Deserialize, Serialize};

const ELLIPSIS: &str = "...";

/// Outcome of validating draft content against a platform limit.
///
/// This is data, not an error: an over-limit draft drives the bounded
/// retry-then-truncate policy in the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// Whether the content fits the limit
    pub ok: bool,
    /// Character count of the content
    pub length: usize,
    /// Limit it was checked against
    pub limit: usize,
    /// Human-readable findings (empty when ok)
    pub issues: Vec<String>,
}

impl Validation {
    /// Serialize for embedding in draft metadata.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Check content against a character limit. Pure; never truncates.
///
/// # Examples
///
/// ```
/// use vasari_core::validate;
///
/// let v = validate("short", 280);
/// assert!(v.ok);
/// assert_eq!(v.length, 5);
///
/// let v = validate("toolong", 5);
/// assert!(!v.ok);
/// assert_eq!(v.issues.len(), 1);
/// ```
pub fn validate(content: &str, limit: usize) -> Validation {
    let length = content.chars().count();
    let mut issues = Vec::new();
    if length > limit {
        issues.push(format!("Length {length} exceeds {limit}"));
    }
    Validation {
        ok: length <= limit,
        length,
        limit,
        issues,
    }
}

/// Truncate content so it never exceeds `limit` characters.
///
/// Content that already fits is returned unchanged. For tiny limits (3 or
/// fewer) the text is hard-cut with no marker; otherwise it is cut to
/// `limit - 3` characters, trailing whitespace trimmed, and an ellipsis
/// marker appended.
///
/// # Examples
///
/// ```
/// use vasari_core::truncate_to_limit;
///
/// assert_eq!(truncate_to_limit("fits", 10), "fits");
/// assert_eq!(truncate_to_limit("a longer sentence", 10), "a longe...");
/// assert_eq!(truncate_to_limit("abcdef", 3), "abc");
/// ```
pub fn truncate_to_limit(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        return content.to_string();
    }
    if limit <= 3 {
        return content.chars().take(limit).collect();
    }
    let head: String = content.chars().take(limit - 3).collect();
    let mut out = head.trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}
