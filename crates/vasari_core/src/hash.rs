//! Normalized content hashing for entry deduplication.

use sha2::{Digest, Sha256};

/// Hash text after normalization: trimmed, lower-cased, whitespace collapsed
/// to single spaces. Two submissions that differ only in casing or spacing
/// hash identically, so the per-user dedupe constraint catches them.
///
/// # Examples
///
/// ```
/// use vasari_core::hash_text;
///
/// assert_eq!(hash_text("Shipped it"), hash_text("  shipped   IT  "));
/// assert_ne!(hash_text("shipped it"), hash_text("shipped that"));
/// ```
pub fn hash_text(text: &str) -> String {
    let normalized = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let digest = Sha256::digest(normalized.as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_for_identical_input() {
        assert_eq!(hash_text("a day at the lake"), hash_text("a day at the lake"));
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        let base = hash_text("wrote some rust");
        assert_eq!(hash_text(" wrote some rust "), base);
        assert_eq!(hash_text("wrote\n\nsome\trust"), base);
    }

    #[test]
    fn distinct_for_distinct_text() {
        assert_ne!(hash_text("monday"), hash_text("tuesday"));
    }

    #[test]
    fn hex_encoded_sha256() {
        let digest = hash_text("x");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
