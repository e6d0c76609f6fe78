//! Stage router error types.

/// Specific error conditions for stage routing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RouterErrorKind {
    /// No routes configured for the requested stage
    #[display("No routes configured for stage '{}'", _0)]
    NoRoutes(String),
    /// Every configured route failed
    #[display("All provider routes failed: {}", _0)]
    AllProvidersFailed(String),
}

impl RouterErrorKind {
    /// Build the aggregate failure kind from per-route error messages.
    pub fn exhausted(errors: &[String]) -> Self {
        Self::AllProvidersFailed(errors.join(" | "))
    }
}

/// Error type for stage routing operations.
///
/// # Examples
///
/// ```
/// use vasari_error::{RouterError, RouterErrorKind};
///
/// let err = RouterError::new(RouterErrorKind::NoRoutes("summarize".to_string()));
/// assert!(format!("{}", err).contains("summarize"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Router Error: {} at line {} in {}", kind, line, file)]
pub struct RouterError {
    /// The specific error condition
    pub kind: RouterErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl RouterError {
    /// Create a new RouterError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RouterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
