//! Length validations for strings and sized containers.
//!
//! String length counts chars. Arrays, sets, maps and objects use their
//! member count. Values without a length pass untouched, so put a schema in
//! front of these actions in a pipe.

use crate::core::{
    add_issue, Config, Dataset, Describe, Identity, IssueDetails, Kind, Message, Schema, Value,
};
use std::fmt;

/// The length requirement a [`LengthAction`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthAssertion {
    /// At least this long
    Min(usize),
    /// At most this long
    Max(usize),
    /// Exactly this long
    Exactly(usize),
    /// Not empty (at least one char or member)
    NonEmpty,
}

impl LengthAssertion {
    fn name(&self) -> &'static str {
        match self {
            LengthAssertion::Min(_) => "min_length",
            LengthAssertion::Max(_) => "max_length",
            LengthAssertion::Exactly(_) => "length",
            LengthAssertion::NonEmpty => "non_empty",
        }
    }

    fn holds(&self, length: usize) -> bool {
        match *self {
            LengthAssertion::Min(min) => length >= min,
            LengthAssertion::Max(max) => length <= max,
            LengthAssertion::Exactly(expected) => length == expected,
            LengthAssertion::NonEmpty => length > 0,
        }
    }
}

impl fmt::Display for LengthAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthAssertion::Min(min) => write!(f, ">={min}"),
            LengthAssertion::Max(max) => write!(f, "<={max}"),
            LengthAssertion::Exactly(length) => write!(f, "{length}"),
            LengthAssertion::NonEmpty => write!(f, "!0"),
        }
    }
}

/// A validation step checking a [`LengthAssertion`].
///
/// # Examples
///
/// ```rust
/// use shape_guard::actions::min_length;
/// use shape_guard::core::{Config, Dataset, Schema};
/// use shape_guard::schemas::{pipe, string};
///
/// let password = pipe(string()).step(min_length(8));
/// let dataset = password.run(Dataset::new("hunter2"), &Config::new());
/// assert_eq!(
///     dataset.issues().unwrap()[0].message,
///     "Invalid length: Expected >=8 but received 7"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct LengthAction {
    assertion: LengthAssertion,
    message: Option<Message>,
}

impl LengthAction {
    pub fn new(assertion: LengthAssertion) -> Self {
        Self {
            assertion,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn assertion(&self) -> LengthAssertion {
        self.assertion
    }
}

impl Describe for LengthAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_tag(&self) -> &str {
        self.assertion.name()
    }

    fn identity(&self) -> Identity {
        Identity::new(self.assertion.name())
    }

    fn expects(&self) -> Option<String> {
        Some(self.assertion.to_string())
    }

    fn requirement(&self) -> Option<Value> {
        match self.assertion {
            LengthAssertion::Min(n) | LengthAssertion::Max(n) | LengthAssertion::Exactly(n) => {
                Some(Value::from(n))
            }
            LengthAssertion::NonEmpty => None,
        }
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for LengthAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(length) = dataset.value.len() {
            if !self.assertion.holds(length) {
                let details = IssueDetails::new().received(length.to_string());
                add_issue(self, "length", &mut dataset, config, details);
            }
        }
        dataset
    }
}

pub fn min_length(min: usize) -> LengthAction {
    LengthAction::new(LengthAssertion::Min(min))
}

pub fn max_length(max: usize) -> LengthAction {
    LengthAction::new(LengthAssertion::Max(max))
}

pub fn length(length: usize) -> LengthAction {
    LengthAction::new(LengthAssertion::Exactly(length))
}

pub fn non_empty() -> LengthAction {
    LengthAction::new(LengthAssertion::NonEmpty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(action: &LengthAction, value: impl Into<Value>) -> Dataset {
        action.run(Dataset::typed(value), &Config::new())
    }

    #[test]
    fn test_length_assertions() {
        assert!(run(&min_length(2), "ab").is_success());
        assert!(run(&max_length(2), "ab").is_success());
        assert!(run(&length(2), "ab").is_success());
        assert!(run(&non_empty(), "a").is_success());

        assert!(run(&min_length(3), "ab").has_issues());
        assert!(run(&max_length(1), "ab").has_issues());
        assert!(run(&length(3), "ab").has_issues());
        assert!(run(&non_empty(), "").has_issues());
    }

    #[test]
    fn test_counts_chars_and_members() {
        assert!(run(&length(2), "äö").is_success());
        assert!(run(&length(3), json!([1, 2, 3])).is_success());
        assert!(run(&max_length(1), json!({"a": 1, "b": 2})).has_issues());
    }

    #[test]
    fn test_issue_fields() {
        let dataset = run(&max_length(2), "abcd");
        assert!(dataset.typed);
        let issue = &dataset.issues().unwrap()[0];
        assert_eq!(issue.kind, Kind::Validation);
        assert_eq!(issue.issue_type, "max_length");
        assert_eq!(issue.expected.as_deref(), Some("<=2"));
        assert_eq!(issue.received, "4");
        assert_eq!(issue.requirement, Some(Value::from(2)));
        assert_eq!(issue.input, Value::from("abcd"));
    }

    #[test]
    fn test_skips_untyped_and_unsized_values() {
        let untyped = min_length(5).run(Dataset::new("ab"), &Config::new());
        assert!(!untyped.has_issues());
        assert!(run(&min_length(5), 12).is_success());
    }

    #[test]
    fn test_own_message() {
        let dataset = run(&non_empty().with_message("required"), "");
        assert_eq!(dataset.issues().unwrap()[0].message, "required");
    }
}
