//! Error types for the shape-guard validation engine.
//!
//! Validation failures are *data*: they travel inside a [`Dataset`](crate::core::Dataset)
//! as [`Issue`](crate::core::Issue) records and never surface as `Err` from a
//! schema's run contract. `ShapeError` covers everything else: malformed
//! composition (an invalid regex handed to an action, a zero-sized cache),
//! the `parse` boundary, which converts an issue-bearing dataset into
//! [`ShapeError::Validation`], and `parse_as` outputs that do not fit the
//! requested type.

use crate::core::Issue;
use std::fmt;
use thiserror::Error;

/// The main error type for the shape-guard library.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// The input did not conform to the schema.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValiError),

    /// A constructor received an argument it cannot work with.
    #[error("Invalid argument for '{name}': {message}")]
    InvalidArgument {
        /// The constructor or parameter that rejected the argument
        name: String,
        /// Detailed error message
        message: String,
    },

    /// A validated output could not be deserialized into the requested type.
    #[error("Type mismatch: expected {expected}, found {found}: {reason}")]
    TypeMismatch {
        /// The requested Rust type
        expected: String,
        /// Description of the validated output
        found: String,
        /// Why deserialization rejected the output
        reason: String,
    },
}

/// A type alias for `Result<T, ShapeError>`.
pub type Result<T> = std::result::Result<T, ShapeError>;

impl ShapeError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the validation issues if this error came from the parse boundary.
    pub fn issues(&self) -> Option<&[Issue]> {
        match self {
            Self::Validation(err) => Some(err.issues()),
            _ => None,
        }
    }
}

/// The aggregate error produced by [`parse`](crate::parse) when validation fails.
///
/// Always holds at least one issue. Its display text is the first issue's message.
#[derive(Debug, Clone)]
pub struct ValiError {
    issues: Vec<Issue>,
}

impl ValiError {
    /// Wraps a non-empty issue list. Returns `None` for an empty list.
    pub fn new(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }

    /// All issues, in the order they were produced.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the error, returning its issues.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl fmt::Display for ValiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.first() {
            Some(issue) => write!(f, "{}", issue.message),
            None => write!(f, "no issues"),
        }
    }
}

impl std::error::Error for ValiError {}
