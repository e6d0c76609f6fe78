//! Target platform enumeration.

use serde::{Deserialize, Serialize};

/// The social platforms a draft can target.
///
/// The set is closed: every draft belongs to exactly one of these, and
/// publisher registries are keyed by this enum rather than free-form strings.
///
/// # Examples
///
/// ```
/// use vasari_core::Platform;
/// use std::str::FromStr;
///
/// assert_eq!(Platform::X.to_string(), "x");
/// assert_eq!(Platform::from_str("linkedin").unwrap(), Platform::LinkedIn);
/// ```
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
pub enum Platform {
    /// X (formerly Twitter)
    X,
    /// Meta Threads
    Threads,
    /// LinkedIn
    LinkedIn,
}

impl Platform {
    /// Default character ceiling for the platform, used when the
    /// configuration does not override it.
    pub fn default_limit(&self) -> usize {
        match self {
            Platform::X => 280,
            Platform::Threads => 500,
            Platform::LinkedIn => 3000,
        }
    }

    /// Uppercase label used to tag deterministic fallback drafts.
    pub fn tag(&self) -> String {
        self.to_string().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn round_trips_through_strings() {
        for platform in Platform::iter() {
            let name = platform.to_string();
            assert_eq!(name.parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn default_limits() {
        assert_eq!(Platform::X.default_limit(), 280);
        assert_eq!(Platform::Threads.default_limit(), 500);
        assert_eq!(Platform::LinkedIn.default_limit(), 3000);
    }
}
