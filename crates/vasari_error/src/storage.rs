//! Persistence error types.

/// Specific error conditions for store operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Referenced record does not exist
    #[display("{} not found: {}", entity, id)]
    NotFound {
        /// Entity name (entry, draft, ...)
        entity: &'static str,
        /// Identifier that failed to resolve
        id: i64,
    },
    /// Uniqueness constraint violated
    #[display("Duplicate {}: {}", entity, detail)]
    Duplicate {
        /// Entity name
        entity: &'static str,
        /// Constraint detail
        detail: String,
    },
    /// Backend failure (connection, query, serialization)
    #[display("Storage backend error: {}", _0)]
    Backend(String),
}

/// Error type for store operations.
///
/// # Examples
///
/// ```
/// use vasari_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound { entity: "draft", id: 7 });
/// assert!(format!("{}", err).contains("draft"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The specific error condition
    pub kind: StorageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StorageError {
    /// Create a new StorageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
