//! Platform publisher error types.

/// Specific error conditions for platform publish calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SocialErrorKind {
    /// Required platform credential is not configured
    #[display("Missing credentials for platform '{}': {} not set", platform, variable)]
    MissingCredentials {
        /// Platform name
        platform: String,
        /// Environment variable expected to hold the credential
        variable: String,
    },
    /// HTTP transport failure
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Platform API returned a non-success status code
    #[display("API error from {platform}: status {status}: {message}")]
    ApiStatus {
        /// Platform name
        platform: String,
        /// HTTP status code
        status: u16,
        /// Response body or error message
        message: String,
    },
    /// Response body could not be parsed
    #[display("Failed to parse platform response: {}", _0)]
    Parse(String),
}

/// Error type for platform publish operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Social Error: {} at line {} in {}", kind, line, file)]
pub struct SocialError {
    /// The specific error condition
    pub kind: SocialErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SocialError {
    /// Create a new SocialError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SocialErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
