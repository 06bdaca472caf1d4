use std::fmt;

/// Result type alias for configuration operations
pub type ParseResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading, converting and saving configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Parse error from pest
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Stored text could not be converted to the requested type
    TypeError {
        key: String,
        expected: String,
        found: String,
    },

    /// Configuration key not found
    KeyNotFound { key: String },

    /// The configuration is not bound to a file
    NoFileBound,

    /// The backing file could not be opened or replaced for writing
    FileUnavailable { path: String, message: String },

    /// File I/O error while reading
    IoError { path: String, message: String },
}

impl ConfigError {
    /// Create a parse error
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a type error
    pub fn type_error(
        key: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ConfigError::TypeError {
            key: key.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a key not found error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        ConfigError::KeyNotFound { key: key.into() }
    }

    /// Create a file unavailable error
    pub fn file_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::FileUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach the key a conversion failed for.
    ///
    /// Value conversions don't know which key they serve, so typed getters
    /// fill it in afterwards.
    pub(crate) fn for_key(self, key: &str) -> Self {
        match self {
            ConfigError::TypeError {
                expected, found, ..
            } => ConfigError::TypeError {
                key: key.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError {
                line,
                column,
                message,
            } => {
                write!(
                    f,
                    "Parse error at line {}, column {}: {}",
                    line, column, message
                )
            }
            ConfigError::TypeError {
                key,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Type error for '{}': expected {}, found '{}'",
                    key, expected, found
                )
            }
            ConfigError::KeyNotFound { key } => {
                write!(f, "Configuration key '{}' not found", key)
            }
            ConfigError::NoFileBound => {
                write!(f, "No file bound to configuration")
            }
            ConfigError::FileUnavailable { path, message } => {
                write!(f, "Unable to open file '{}' for writing: {}", path, message)
            }
            ConfigError::IoError { path, message } => {
                write!(f, "I/O error for '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl<R: pest::RuleType> From<pest::error::Error<R>> for ConfigError {
    fn from(err: pest::error::Error<R>) -> Self {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos((line, col)) => (line, col),
            pest::error::LineColLocation::Span((line, col), _) => (line, col),
        };

        ConfigError::ParseError {
            line,
            column,
            message: err.variant.to_string(),
        }
    }
}
