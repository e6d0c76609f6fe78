//! Generation provider error types.

/// Specific error conditions for generation provider calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Required API credential is not configured
    #[display("Missing credentials for provider '{}': {} not set", provider, variable)]
    MissingCredentials {
        /// Provider name
        provider: String,
        /// Environment variable expected to hold the credential
        variable: String,
    },
    /// HTTP transport failure (connect, TLS, timeout)
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Provider returned a non-success status code
    #[display("API error from {provider}: status {status}: {message}")]
    ApiStatus {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Response body or error message
        message: String,
    },
    /// Response body could not be parsed
    #[display("Failed to parse provider response: {}", _0)]
    Parse(String),
    /// Response contained no usable text output
    #[display("Provider {} returned an empty completion", _0)]
    EmptyCompletion(String),
}

/// Error type for generation provider operations.
///
/// # Examples
///
/// ```
/// use vasari_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Http("timeout".to_string()));
/// assert!(format!("{}", err).contains("timeout"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The specific error condition
    pub kind: ProviderErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
