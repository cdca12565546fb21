//! Numeric bound and integer validations.

use crate::core::{
    add_issue, format_number, Config, Dataset, Describe, Identity, IssueDetails, Kind, Message,
    Schema, Value,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueAssertion {
    Min(f64),
    Max(f64),
    Integer,
}

impl ValueAssertion {
    fn name(&self) -> &'static str {
        match self {
            ValueAssertion::Min(_) => "min_value",
            ValueAssertion::Max(_) => "max_value",
            ValueAssertion::Integer => "integer",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ValueAssertion::Integer => "integer",
            _ => "value",
        }
    }

    fn holds(&self, n: f64) -> bool {
        match *self {
            ValueAssertion::Min(min) => n >= min,
            ValueAssertion::Max(max) => n <= max,
            ValueAssertion::Integer => n.is_finite() && n.fract() == 0.0,
        }
    }
}

/// A validation step over numeric values. Non-numbers pass untouched.
#[derive(Debug, Clone)]
pub struct ValueAction {
    assertion: ValueAssertion,
    message: Option<Message>,
}

impl ValueAction {
    pub fn new(assertion: ValueAssertion) -> Self {
        Self {
            assertion,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn assertion(&self) -> ValueAssertion {
        self.assertion
    }
}

impl Describe for ValueAction {
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
        match self.assertion {
            ValueAssertion::Min(min) => Some(format!(">={}", format_number(min))),
            ValueAssertion::Max(max) => Some(format!("<={}", format_number(max))),
            ValueAssertion::Integer => None,
        }
    }

    fn requirement(&self) -> Option<Value> {
        match self.assertion {
            ValueAssertion::Min(n) | ValueAssertion::Max(n) => Some(Value::from(n)),
            ValueAssertion::Integer => None,
        }
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for ValueAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(n) = dataset.value.as_f64() {
            if !self.assertion.holds(n) {
                add_issue(
                    self,
                    self.assertion.label(),
                    &mut dataset,
                    config,
                    IssueDetails::new(),
                );
            }
        }
        dataset
    }
}

/// Requires numbers `>= min`.
pub fn min_value(min: f64) -> ValueAction {
    ValueAction::new(ValueAssertion::Min(min))
}

/// Requires numbers `<= max`.
pub fn max_value(max: f64) -> ValueAction {
    ValueAction::new(ValueAssertion::Max(max))
}

pub fn integer() -> ValueAction {
    ValueAction::new(ValueAssertion::Integer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(action: &ValueAction, value: impl Into<Value>) -> Dataset {
        action.run(Dataset::typed(value), &Config::new())
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(run(&min_value(3.0), 3).is_success());
        assert!(run(&max_value(3.0), 3).is_success());
        assert!(run(&min_value(3.0), 2.5).has_issues());
        assert!(run(&max_value(3.0), 3.5).has_issues());
    }

    #[test]
    fn test_min_value_message() {
        let dataset = run(&min_value(10.0), 4);
        let issue = &dataset.issues().unwrap()[0];
        assert_eq!(issue.issue_type, "min_value");
        assert_eq!(issue.message, "Invalid value: Expected >=10 but received 4");
        assert_eq!(issue.requirement, Some(Value::from(10)));
    }

    #[test]
    fn test_integer() {
        assert!(run(&integer(), 4).is_success());
        let dataset = run(&integer(), 1.5);
        assert_eq!(
            dataset.issues().unwrap()[0].message,
            "Invalid integer: Received 1.5"
        );
        assert!(run(&integer(), f64::INFINITY).has_issues());
    }

    #[test]
    fn test_non_numbers_pass() {
        assert!(run(&min_value(1.0), "abc").is_success());
    }
}
