//! Error types for the Vasari drafting pipeline.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use vasari_error::{VasariResult, ProviderError, ProviderErrorKind};
//!
//! fn call_provider() -> VasariResult<String> {
//!     Err(ProviderError::new(ProviderErrorKind::Http("connection refused".to_string())))?
//! }
//!
//! assert!(call_provider().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod parse;
mod provider;
mod router;
mod social;
mod storage;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{VasariError, VasariErrorKind, VasariResult};
pub use parse::{ParseError, ParseErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
pub use router::{RouterError, RouterErrorKind};
pub use social::{SocialError, SocialErrorKind};
pub use storage::{StorageError, StorageErrorKind};
