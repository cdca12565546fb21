//! Transformation steps that replace the value in flight.
//!
//! Inside a pipe, transformations only run while the dataset carries no
//! issues, so they always see a typed value.

use crate::core::{
    add_issue, AsyncSchema, Config, Dataset, Describe, Identity, IssueDetails, Kind, Message,
    Schema, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

pub type Operation = dyn Fn(Value) -> Value + Send + Sync;
pub type FallibleOperation = dyn Fn(Value) -> Result<Value, String> + Send + Sync;
pub type AsyncOperation = dyn Fn(Value) -> BoxFuture<'static, Value> + Send + Sync;

/// An infallible transformation.
#[derive(Clone)]
pub struct TransformAction {
    name: &'static str,
    operation: Arc<Operation>,
}

impl fmt::Debug for TransformAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl TransformAction {
    fn named(name: &'static str, operation: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            name,
            operation: Arc::new(operation),
        }
    }
}

impl Describe for TransformAction {
    fn kind(&self) -> Kind {
        Kind::Transformation
    }

    fn type_tag(&self) -> &str {
        self.name
    }

    fn identity(&self) -> Identity {
        Identity::new(self.name)
    }
}

impl Schema for TransformAction {
    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        let value = std::mem::take(&mut dataset.value);
        dataset.value = (self.operation)(value);
        dataset
    }
}

/// ```rust
/// use shape_guard::actions::transform;
/// use shape_guard::core::{Config, Dataset, Schema, Value};
/// use shape_guard::schemas::{number, pipe};
///
/// let doubled = pipe(number()).step(transform(|v| Value::from(v.as_f64().unwrap_or(0.0) * 2.0)));
/// let dataset = doubled.run(Dataset::new(21), &Config::new());
/// assert_eq!(dataset.value, Value::from(42));
/// ```
pub fn transform(operation: impl Fn(Value) -> Value + Send + Sync + 'static) -> TransformAction {
    TransformAction::named("transform", operation)
}

fn map_string(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

/// Trims surrounding whitespace from strings.
pub fn trim() -> TransformAction {
    TransformAction::named("trim", |v| map_string(v, |s| s.trim().to_string()))
}

pub fn to_lower_case() -> TransformAction {
    TransformAction::named("to_lower_case", |v| map_string(v, str::to_lowercase))
}

pub fn to_upper_case() -> TransformAction {
    TransformAction::named("to_upper_case", |v| map_string(v, str::to_uppercase))
}

/// A transformation that may fail. A failure leaves the value unchanged,
/// reports a transformation issue carrying the error text and marks the
/// dataset untyped.
#[derive(Clone)]
pub struct TryTransformAction {
    operation: Arc<FallibleOperation>,
    message: Option<Message>,
}

impl fmt::Debug for TryTransformAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryTransformAction")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl TryTransformAction {
    /// Replaces the error text with a fixed or dynamic message.
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Describe for TryTransformAction {
    fn kind(&self) -> Kind {
        Kind::Transformation
    }

    fn type_tag(&self) -> &str {
        "try_transform"
    }

    fn identity(&self) -> Identity {
        Identity::new("try_transform")
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for TryTransformAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        match (self.operation)(dataset.value.clone()) {
            Ok(value) => dataset.value = value,
            Err(error) => {
                let details = match self.message {
                    Some(_) => IssueDetails::new(),
                    None => IssueDetails::new().message(error),
                };
                add_issue(self, "input", &mut dataset, config, details);
                dataset.typed = false;
            }
        }
        dataset
    }
}

/// ```rust
/// use shape_guard::actions::try_transform;
/// use shape_guard::core::{Config, Dataset, Schema, Value};
/// use shape_guard::schemas::{pipe, string};
///
/// let parsed = pipe(string()).step(try_transform(|v| {
///     v.as_str()
///         .and_then(|s| s.parse::<f64>().ok())
///         .map(Value::from)
///         .ok_or_else(|| "not a number".to_string())
/// }));
/// assert_eq!(parsed.run(Dataset::new("2.5"), &Config::new()).value, Value::from(2.5));
/// assert!(!parsed.run(Dataset::new("x"), &Config::new()).typed);
/// ```
pub fn try_transform(
    operation: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
) -> TryTransformAction {
    TryTransformAction {
        operation: Arc::new(operation),
        message: None,
    }
}

/// A transformation that must be awaited.
#[derive(Clone)]
pub struct TransformAsyncAction {
    operation: Arc<AsyncOperation>,
}

impl fmt::Debug for TransformAsyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAsyncAction").finish_non_exhaustive()
    }
}

impl Describe for TransformAsyncAction {
    fn kind(&self) -> Kind {
        Kind::Transformation
    }

    fn type_tag(&self) -> &str {
        "transform"
    }

    fn identity(&self) -> Identity {
        Identity::new("transform_async")
    }

    fn is_async(&self) -> bool {
        true
    }
}

#[async_trait]
impl AsyncSchema for TransformAsyncAction {
    async fn run_async(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        let value = std::mem::take(&mut dataset.value);
        dataset.value = (self.operation)(value).await;
        dataset
    }
}

impl_into_schema_ref!(TransformAsyncAction);

pub fn transform_async(
    operation: impl Fn(Value) -> BoxFuture<'static, Value> + Send + Sync + 'static,
) -> TransformAsyncAction {
    TransformAsyncAction {
        operation: Arc::new(operation),
    }
}
