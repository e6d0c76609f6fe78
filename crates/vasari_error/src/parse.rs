//! Parse error types for user-supplied and config-supplied strings.

/// Specific error conditions for parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ParseErrorKind {
    /// Route string was not of the form `provider:model`
    #[display("Invalid route '{}': expected 'provider:model'", _0)]
    Route(String),
    /// Datetime string did not match an accepted format
    #[display("Invalid datetime '{}': expected YYYY-MM-DD HH:MM", _0)]
    Datetime(String),
}

/// Error type for parse operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The specific error condition
    pub kind: ParseErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
