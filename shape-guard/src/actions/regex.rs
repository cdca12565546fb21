//! Pattern validation for strings.

use crate::core::{
    add_issue, Config, Dataset, Describe, Identity, IssueDetails, Kind, Message, Schema, Value,
};
use crate::error::{Result, ShapeError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Compiled patterns, shared by every `regex` action built from the same source.
static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn compile(pattern: &str) -> Result<Regex> {
    if let Some(regex) = PATTERN_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(regex.clone());
    }
    let regex = Regex::new(pattern)
        .map_err(|e| ShapeError::invalid_argument("regex", format!("invalid pattern: {e}")))?;
    PATTERN_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

/// Requires strings to match a pattern. Other values pass untouched.
#[derive(Debug, Clone)]
pub struct RegexAction {
    regex: Regex,
    message: Option<Message>,
}

impl RegexAction {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Describe for RegexAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_tag(&self) -> &str {
        "regex"
    }

    fn identity(&self) -> Identity {
        Identity::new("regex")
    }

    fn expects(&self) -> Option<String> {
        Some(format!("/{}/", self.regex.as_str()))
    }

    fn requirement(&self) -> Option<Value> {
        Some(Value::from(self.regex.as_str()))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for RegexAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        let matches = match dataset.value.as_str() {
            Some(s) => self.regex.is_match(s),
            None => true,
        };
        if !matches {
            add_issue(self, "format", &mut dataset, config, IssueDetails::new());
        }
        dataset
    }
}

/// Builds a pattern validation. Fails on an invalid pattern.
///
/// ```rust
/// use shape_guard::actions::regex;
///
/// assert!(regex("^[a-z]+$").is_ok());
/// assert!(regex("([a-z]").is_err());
/// ```
pub fn regex(pattern: &str) -> Result<RegexAction> {
    Ok(RegexAction {
        regex: compile(pattern)?,
        message: None,
    })
}
