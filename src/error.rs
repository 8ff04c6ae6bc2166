//! Error types for branch-export
//!
//! Every client operation reports failure through [`Error`]. The variants follow the life of an
//! export call:
//! - invalid input caught before any network traffic ([`Error::Validation`], [`Error::Config`])
//! - caller misuse of the job protocol ([`Error::Precondition`])
//! - transport and HTTP status failures ([`Error::Network`], [`Error::Timeout`],
//!   [`Error::UnsuccessfulStatus`])
//! - payload failures ([`Error::Serialization`], [`Error::Deserialization`])
//! - local file failures while materializing a download ([`Error::Io`])

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for branch-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for branch-export
#[derive(Debug, Error)]
pub enum Error {
    /// Client configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "timeout")
        key: Option<String>,
    },

    /// A message failed its structural invariants before any network call
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// The server answered with a status code other than 200
    #[error("unsuccessful status code: {code} ({url})")]
    UnsuccessfulStatus {
        /// The HTTP status code returned by the server
        code: u16,
        /// The request URL, without query parameters
        url: String,
    },

    /// An operation was invoked on a message in the wrong protocol state
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A request object could not be encoded as JSON
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A response body was not valid JSON or did not match the expected shape
    #[error("deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// Transport failure (connect, connect timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No response headers arrived within the request timeout
    #[error("request timed out after {timeout:?} ({url})")]
    Timeout {
        /// The request timeout that elapsed
        timeout: Duration,
        /// The request URL, without query parameters
        url: String,
    },

    /// Local file system failure while downloading an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error for the given key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Machine-readable error code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::UnsuccessfulStatus { .. } => "unsuccessful_status",
            Error::Precondition(_) => "precondition_failed",
            Error::Serialization(_) => "serialization_error",
            Error::Deserialization(_) => "deserialization_error",
            Error::Network(_) => "network_error",
            Error::Timeout { .. } => "timeout",
            Error::Io(_) => "io_error",
        }
    }

    /// The HTTP status code carried by [`Error::UnsuccessfulStatus`]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::UnsuccessfulStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The violated invariants carried by [`Error::Validation`]
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Error::Validation(violations) => Some(violations),
            _ => None,
        }
    }
}

/// A single violated invariant of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The attribute (or derived predicate) that is invalid, e.g. "report_type"
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl Violation {
    /// Create a violation for the given field
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Non-empty list of violated invariants carried by [`Error::Validation`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(pub Vec<Violation>);

impl Violations {
    /// Turn a violation list into `Ok(())` when empty, or a validation error otherwise
    pub fn into_result(violations: Vec<Violation>) -> Result<()> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(Self(violations)))
        }
    }

    /// Whether any violation concerns the given field
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// Iterate over the violations
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Number of violations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
