//! Leaf schemas for primitive kinds, literals and custom predicates.

use crate::core::{
    add_issue, AsyncSchema, Config, Dataset, Describe, Identity, IssueDetails, Kind, Message,
    Schema, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// The kinds a [`PrimitiveSchema`] can check for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Date,
    Any,
    Unknown,
    Never,
}

impl PrimitiveType {
    fn name(self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Date => "date",
            PrimitiveType::Any => "any",
            PrimitiveType::Unknown => "unknown",
            PrimitiveType::Never => "never",
        }
    }

    fn expects(self) -> &'static str {
        match self {
            PrimitiveType::Date => "Date",
            other => other.name(),
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            PrimitiveType::String => matches!(value, Value::String(_)),
            PrimitiveType::Number => matches!(value, Value::Number(n) if !n.is_nan()),
            PrimitiveType::Boolean => matches!(value, Value::Bool(_)),
            PrimitiveType::Null => value.is_null(),
            PrimitiveType::Undefined => value.is_undefined(),
            PrimitiveType::Date => matches!(value, Value::Date(_)),
            PrimitiveType::Any | PrimitiveType::Unknown => true,
            PrimitiveType::Never => false,
        }
    }
}

/// A schema that accepts values of one primitive kind unchanged.
#[derive(Debug, Clone)]
pub struct PrimitiveSchema {
    primitive: PrimitiveType,
    message: Option<Message>,
}

impl PrimitiveSchema {
    pub fn new(primitive: PrimitiveType) -> Self {
        Self {
            primitive,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }
}

impl Describe for PrimitiveSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        self.primitive.name()
    }

    fn identity(&self) -> Identity {
        Identity::new(self.primitive.name())
    }

    fn expects(&self) -> Option<String> {
        Some(self.primitive.expects().to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for PrimitiveSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if self.primitive.accepts(&dataset.value) {
            dataset.typed = true;
        } else {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
        }
        dataset
    }
}

pub fn string() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::String)
}

/// Numbers other than `NaN`.
pub fn number() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Number)
}

pub fn boolean() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Boolean)
}

pub fn null() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Null)
}

pub fn undefined() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Undefined)
}

pub fn date() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Date)
}

pub fn any() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Any)
}

pub fn unknown() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Unknown)
}

pub fn never() -> PrimitiveSchema {
    PrimitiveSchema::new(PrimitiveType::Never)
}

/// Accepts exactly one value, or one of several (a picklist).
#[derive(Debug, Clone)]
pub struct LiteralSchema {
    identity: Identity,
    options: Vec<Value>,
    message: Option<Message>,
}

impl LiteralSchema {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The accepted values in declaration order.
    pub fn options(&self) -> &[Value] {
        &self.options
    }
}

impl Describe for LiteralSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        self.identity.name()
    }

    fn identity(&self) -> Identity {
        self.identity
    }

    fn expects(&self) -> Option<String> {
        Some(join_expects(
            self.options.iter().map(Value::received).collect(),
            "|",
        ))
    }

    fn requirement(&self) -> Option<Value> {
        Some(Value::Array(self.options.clone()))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for LiteralSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if self.options.contains(&dataset.value) {
            dataset.typed = true;
        } else {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
        }
        dataset
    }
}

pub fn literal(value: impl Into<Value>) -> LiteralSchema {
    LiteralSchema {
        identity: Identity::new("literal"),
        options: vec![value.into()],
        message: None,
    }
}

pub fn picklist<V: Into<Value>>(options: impl IntoIterator<Item = V>) -> LiteralSchema {
    LiteralSchema {
        identity: Identity::new("picklist"),
        options: options.into_iter().map(Into::into).collect(),
        message: None,
    }
}

/// Joins expectation strings: duplicates are dropped, more than one entry is
/// parenthesised, and an empty list reads `never`.
pub fn join_expects(expects: Vec<String>, separator: &str) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(expects.len());
    for expect in expects {
        if !unique.contains(&expect) {
            unique.push(expect);
        }
    }
    match unique.len() {
        0 => "never".to_string(),
        1 => unique.remove(0),
        _ => format!("({})", unique.join(&format!(" {separator} "))),
    }
}

/// A predicate over an input value.
pub type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A schema defined by an arbitrary predicate.
#[derive(Clone)]
pub struct CustomSchema {
    predicate: Arc<Predicate>,
    message: Option<Message>,
}

impl fmt::Debug for CustomSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSchema")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl CustomSchema {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Describe for CustomSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "custom"
    }

    fn identity(&self) -> Identity {
        Identity::new("custom")
    }

    fn expects(&self) -> Option<String> {
        Some("unknown".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for CustomSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if (self.predicate)(&dataset.value) {
            dataset.typed = true;
        } else {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
        }
        dataset
    }
}

pub fn custom(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> CustomSchema {
    CustomSchema {
        predicate: Arc::new(predicate),
        message: None,
    }
}

/// An asynchronous predicate over an input value.
pub type AsyncPredicate = dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync;

/// A schema defined by a predicate that must be awaited, such as a lookup.
#[derive(Clone)]
pub struct CustomAsyncSchema {
    predicate: Arc<AsyncPredicate>,
    message: Option<Message>,
}

impl fmt::Debug for CustomAsyncSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAsyncSchema")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl CustomAsyncSchema {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Describe for CustomAsyncSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "custom"
    }

    fn identity(&self) -> Identity {
        Identity::new("custom_async")
    }

    fn expects(&self) -> Option<String> {
        Some("unknown".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn is_async(&self) -> bool {
        true
    }
}

#[async_trait]
impl AsyncSchema for CustomAsyncSchema {
    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if (self.predicate)(dataset.value.clone()).await {
            dataset.typed = true;
        } else {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
        }
        dataset
    }
}

impl_into_schema_ref!(CustomAsyncSchema);

/// Builds an async custom schema from a closure returning a boxed future.
///
/// ```rust
/// use futures::FutureExt;
/// use shape_guard::schemas::custom_async;
///
/// let schema = custom_async(|value| async move { value.as_str() == Some("ok") }.boxed());
/// ```
pub fn custom_async(
    predicate: impl Fn(Value) -> BoxFuture<'static, bool> + Send + Sync + 'static,
) -> CustomAsyncSchema {
    CustomAsyncSchema {
        predicate: Arc::new(predicate),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;

    fn run(schema: &impl Schema, value: impl Into<Value>) -> Dataset {
        schema.run(Dataset::new(value), &Config::new())
    }

    #[test]
    fn test_string_accepts_strings_only() {
        assert!(run(&string(), "hello").is_success());

        let dataset = run(&string(), 123);
        assert!(!dataset.typed);
        let issue = &dataset.issues().unwrap()[0];
        assert_eq!(issue.kind, Kind::Schema);
        assert_eq!(issue.issue_type, "string");
        assert_eq!(issue.expected.as_deref(), Some("string"));
        assert_eq!(issue.received, "123");
        assert_eq!(issue.message, "Invalid type: Expected string but received 123");
    }

    #[test]
    fn test_number_rejects_nan() {
        assert!(run(&number(), 1.5).is_success());
        assert!(!run(&number(), f64::NAN).typed);
        assert!(!run(&number(), "1").typed);
    }

    #[test]
    fn test_undefined_and_null_are_distinct() {
        assert!(run(&null(), Value::Null).is_success());
        assert!(!run(&null(), Value::Undefined).typed);
        assert!(run(&undefined(), Value::Undefined).is_success());
        assert!(!run(&undefined(), Value::Null).typed);
    }

    #[test]
    fn test_any_unknown_never() {
        assert!(run(&any(), Value::from(json!({"x": 1}))).is_success());
        assert!(run(&unknown(), Value::Undefined).is_success());
        let dataset = run(&never(), 1);
        assert_eq!(
            dataset.issues().unwrap()[0].message,
            "Invalid type: Expected never but received 1"
        );
    }

    #[test]
    fn test_with_message_overrides_default() {
        let dataset = run(&string().with_message("Name must be text"), 1);
        assert_eq!(dataset.issues().unwrap()[0].message, "Name must be text");
    }

    #[test]
    fn test_picklist_expectation() {
        let schema = picklist(["red", "green"]);
        assert!(run(&schema, "red").is_success());
        let dataset = run(&schema, "blue");
        assert_eq!(
            dataset.issues().unwrap()[0].message,
            "Invalid type: Expected (\"red\" | \"green\") but received \"blue\""
        );
        assert_eq!(
            run(&literal(5), 6).issues().unwrap()[0].expected.as_deref(),
            Some("5")
        );
    }

    #[test]
    fn test_join_expects_deduplicates() {
        assert_eq!(
            join_expects(vec!["string".into(), "string".into()], "|"),
            "string"
        );
        assert_eq!(
            join_expects(vec!["string".into(), "number".into()], "|"),
            "(string | number)"
        );
        assert_eq!(join_expects(Vec::new(), "|"), "never");
    }

    #[test]
    fn test_custom_predicate() {
        let even = custom(|v| v.as_f64().is_some_and(|n| n % 2.0 == 0.0));
        assert!(run(&even, 4).is_success());
        assert_eq!(run(&even, 3).issues().unwrap()[0].issue_type, "custom");
    }

    #[tokio::test]
    async fn test_custom_async_predicate() {
        let schema = custom_async(|v| async move { v.as_str() == Some("ok") }.boxed());
        let passed = schema.run_async(Dataset::new("ok"), &Config::new()).await;
        assert!(passed.is_success());
        let failed = schema.run_async(Dataset::new("no"), &Config::new()).await;
        assert!(!failed.typed);
    }
}
