//! Configuration error types.

/// Specific error conditions for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ConfigErrorKind {
    /// Failed to read a configuration file
    #[display("Failed to read config file: {}", _0)]
    FileRead(String),
    /// Failed to parse TOML content
    #[display("Failed to parse TOML: {}", _0)]
    TomlParse(String),
    /// A configured value is out of range or malformed
    #[display("Invalid config value for '{}': {}", key, message)]
    InvalidValue {
        /// Dotted config key
        key: String,
        /// What is wrong with it
        message: String,
    },
    /// Unknown timezone name
    #[display("Unknown timezone: {}", _0)]
    UnknownTimezone(String),
}

/// Error type for configuration operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Config Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The specific error condition
    pub kind: ConfigErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
