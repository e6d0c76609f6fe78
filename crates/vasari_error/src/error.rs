//! Top-level error wrapper types.

use crate::{ConfigError, ParseError, ProviderError, RouterError, SocialError, StorageError};

/// Foundation error enum aggregating the per-concern error types.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::Backend("poisoned lock".to_string()));
/// let err: VasariError = storage_err.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VasariErrorKind {
    /// Generation provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Stage router error
    #[from(RouterError)]
    Router(RouterError),
    /// Platform publisher error
    #[from(SocialError)]
    Social(SocialError),
    /// Persistence error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Parse error
    #[from(ParseError)]
    Parse(ParseError),
}

/// Vasari error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vasari_error::{VasariResult, ParseError, ParseErrorKind};
///
/// fn might_fail() -> VasariResult<()> {
///     Err(ParseError::new(ParseErrorKind::Datetime("yesterday".to_string())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vasari Error: {}", _0)]
pub struct VasariError(Box<VasariErrorKind>);

impl VasariError {
    /// Create a new error from a kind.
    pub fn new(kind: VasariErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VasariErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VasariErrorKind
impl<T> From<T> for VasariError
where
    T: Into<VasariErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vasari operations.
pub type VasariResult<T> = std::result::Result<T, VasariError>;
