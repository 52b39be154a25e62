//! Error types for the conversion library.

use std::path::PathBuf;

use thiserror::Error;

use crate::value::TargetType;

/// Comprehensive error type for all conversion operations.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// No value was supplied and no default is configured
    #[error("No value specified for '{target}'")]
    Missing { target: TargetType },
    /// Text did not match a date/time pattern
    #[error("Error converting '{input}' to '{target}' using pattern '{pattern}': {reason}")]
    Parse {
        input: String,
        target: TargetType,
        pattern: String,
        reason: String,
    },
    /// Text did not match the default (JDBC escape) form of the target type
    #[error("String must be in JDBC format [{expected}] to create a {target}, got '{input}'")]
    InvalidJdbc {
        input: String,
        target: TargetType,
        expected: &'static str,
    },
    /// A date/time pattern could not be compiled
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    /// A locale selector could not be parsed
    #[error("Invalid locale '{0}'")]
    InvalidLocale(String),
    /// A time zone name could not be resolved
    #[error("Invalid time zone '{name}': {source}")]
    InvalidTimeZone {
        name: String,
        #[source]
        source: jiff::Error,
    },
    /// A date/time value fell outside the supported range
    #[error("Value out of range: {message}")]
    OutOfRange {
        message: String,
        #[source]
        source: jiff::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
}

/// Builder for creating pattern errors.
pub struct InvalidPatternBuilder {
    pattern: String,
}

impl InvalidPatternBuilder {
    /// Create a new pattern error builder for a pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ConversionError {
        ConversionError::InvalidPattern {
            pattern: self.pattern,
            reason: reason.into(),
        }
    }
}

/// Builder for creating parse errors.
pub struct ParseErrorBuilder {
    input: String,
    target: TargetType,
}

impl ParseErrorBuilder {
    /// Create a new parse error builder for an input and target.
    pub fn new(input: impl Into<String>, target: TargetType) -> Self {
        Self {
            input: input.into(),
            target,
        }
    }

    /// Build the error for the given pattern and reason.
    pub fn with_pattern(
        self,
        pattern: impl Into<String>,
        reason: impl Into<String>,
    ) -> ConversionError {
        ConversionError::Parse {
            input: self.input,
            target: self.target,
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

impl ConversionError {
    /// Creates a builder for pattern compilation errors.
    pub fn invalid_pattern(pattern: impl Into<String>) -> InvalidPatternBuilder {
        InvalidPatternBuilder::new(pattern)
    }

    /// Creates a builder for parse errors.
    pub fn parse(input: impl Into<String>, target: TargetType) -> ParseErrorBuilder {
        ParseErrorBuilder::new(input, target)
    }

    /// Creates an out of range error from a jiff error.
    pub fn out_of_range(message: impl Into<String>, source: jiff::Error) -> Self {
        Self::OutOfRange {
            message: message.into(),
            source,
        }
    }
}

/// Extension trait mapping jiff errors into [`ConversionError::OutOfRange`].
pub trait RangeResultExt<T> {
    /// Map range errors with a message.
    fn range_context(self, message: &str) -> Result<T>;
}

impl<T> RangeResultExt<T> for std::result::Result<T, jiff::Error> {
    fn range_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ConversionError::out_of_range(message, e))
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;
