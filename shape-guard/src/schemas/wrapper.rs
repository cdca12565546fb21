//! Wrapper schemas that widen or narrow another schema's accepted values.

use super::primitive::join_expects;
use crate::core::{
    add_issue, boxed, AsyncSchema, BoxedSchema, ChildSchema, Config, Dataset, Describe, Identity,
    IntoSchemaRef, IssueDetails, Kind, Message, Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;

/// Which values a [`WrapperSchema`] handles itself instead of delegating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperType {
    /// Accepts `undefined`
    Optional,
    /// Accepts `null`
    Nullable,
    /// Accepts `undefined` and `null`
    Nullish,
    /// Rejects `undefined`
    NonOptional,
}

impl WrapperType {
    fn name(self) -> &'static str {
        match self {
            WrapperType::Optional => "optional",
            WrapperType::Nullable => "nullable",
            WrapperType::Nullish => "nullish",
            WrapperType::NonOptional => "non_optional",
        }
    }

    fn covers(self, value: &Value) -> bool {
        match self {
            WrapperType::Optional | WrapperType::NonOptional => value.is_undefined(),
            WrapperType::Nullable => value.is_null(),
            WrapperType::Nullish => value.is_undefined() || value.is_null(),
        }
    }
}

/// Wraps a schema `S`: a [`BoxedSchema`] for the sync variant, a
/// [`SchemaRef`] for the async one.
#[derive(Debug, Clone)]
pub struct WrapperSchema<S> {
    wrapper: WrapperType,
    wrapped: S,
    default: Option<Value>,
    message: Option<Message>,
}

/// The async wrapper variant.
pub type WrapperAsync = WrapperSchema<SchemaRef>;

impl<S> WrapperSchema<S> {
    fn new(wrapper: WrapperType, wrapped: S) -> Self {
        Self {
            wrapper,
            wrapped,
            default: None,
            message: None,
        }
    }

    /// Replaces a covered input with `default` before validating it.
    /// Ignored by `non_optional`.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn wrapper(&self) -> WrapperType {
        self.wrapper
    }

    pub fn wrapped(&self) -> &S {
        &self.wrapped
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

enum Handled {
    Done(Dataset),
    Delegate(Dataset),
}

impl<S: ChildSchema> WrapperSchema<S> {
    /// The part of the run shared by both variants.
    fn handle(&self, mut dataset: Dataset, config: &Config) -> Handled {
        if !self.wrapper.covers(&dataset.value) {
            return Handled::Delegate(dataset);
        }
        if self.wrapper == WrapperType::NonOptional {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return Handled::Done(dataset);
        }
        match &self.default {
            Some(default) => {
                dataset.value = default.clone();
                if self.wrapper.covers(&dataset.value) {
                    dataset.typed = true;
                    Handled::Done(dataset)
                } else {
                    Handled::Delegate(dataset)
                }
            }
            None => {
                dataset.typed = true;
                Handled::Done(dataset)
            }
        }
    }
}

impl<S: ChildSchema> Describe for WrapperSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        self.wrapper.name()
    }

    fn identity(&self) -> Identity {
        Identity::new(self.wrapper.name())
    }

    fn expects(&self) -> Option<String> {
        let inner = self.wrapped.expects().unwrap_or_else(|| "unknown".to_string());
        let expects = match self.wrapper {
            WrapperType::Optional => join_expects(vec![inner, "undefined".into()], "|"),
            WrapperType::Nullable => join_expects(vec![inner, "null".into()], "|"),
            WrapperType::Nullish => {
                join_expects(vec![inner, "null".into(), "undefined".into()], "|")
            }
            WrapperType::NonOptional => "!undefined".to_string(),
        };
        Some(expects)
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for WrapperSchema<BoxedSchema> {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        match self.handle(dataset, config) {
            Handled::Done(dataset) => dataset,
            Handled::Delegate(dataset) => self.wrapped.run(dataset, config),
        }
    }
}

#[async_trait]
impl AsyncSchema for WrapperSchema<SchemaRef> {
    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset {
        match self.handle(dataset, config) {
            Handled::Done(dataset) => dataset,
            Handled::Delegate(dataset) => self.wrapped.run(dataset, config).await,
        }
    }
}

impl_into_schema_ref!(WrapperSchema<SchemaRef>);

pub fn optional(wrapped: impl Schema + 'static) -> WrapperSchema<BoxedSchema> {
    WrapperSchema::new(WrapperType::Optional, boxed(wrapped))
}

pub fn nullable(wrapped: impl Schema + 'static) -> WrapperSchema<BoxedSchema> {
    WrapperSchema::new(WrapperType::Nullable, boxed(wrapped))
}

pub fn nullish(wrapped: impl Schema + 'static) -> WrapperSchema<BoxedSchema> {
    WrapperSchema::new(WrapperType::Nullish, boxed(wrapped))
}

pub fn non_optional(wrapped: impl Schema + 'static) -> WrapperSchema<BoxedSchema> {
    WrapperSchema::new(WrapperType::NonOptional, boxed(wrapped))
}

pub fn optional_async(wrapped: impl IntoSchemaRef) -> WrapperAsync {
    WrapperSchema::new(WrapperType::Optional, wrapped.into_schema_ref())
}

pub fn nullable_async(wrapped: impl IntoSchemaRef) -> WrapperAsync {
    WrapperSchema::new(WrapperType::Nullable, wrapped.into_schema_ref())
}

pub fn nullish_async(wrapped: impl IntoSchemaRef) -> WrapperAsync {
    WrapperSchema::new(WrapperType::Nullish, wrapped.into_schema_ref())
}

pub fn non_optional_async(wrapped: impl IntoSchemaRef) -> WrapperAsync {
    WrapperSchema::new(WrapperType::NonOptional, wrapped.into_schema_ref())
}

/// Wraps an existing boxed schema without re-boxing it.
pub(crate) fn wrap_boxed(wrapper: WrapperType, wrapped: BoxedSchema) -> BoxedSchema {
    boxed(WrapperSchema::new(wrapper, wrapped))
}

/// Wraps an existing async child without re-boxing it.
pub(crate) fn wrap_ref(wrapper: WrapperType, wrapped: SchemaRef) -> SchemaRef {
    WrapperSchema::new(wrapper, wrapped).into_schema_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{number, string};

    fn run(schema: &impl Schema, value: Value) -> Dataset {
        schema.run(Dataset::new(value), &Config::new())
    }

    #[test]
    fn test_optional_accepts_undefined_only() {
        let schema = optional(string());
        assert!(run(&schema, Value::Undefined).is_success());
        assert!(run(&schema, Value::from("x")).is_success());

        let dataset = run(&schema, Value::Null);
        let issue = &dataset.issues().unwrap()[0];
        assert_eq!(issue.issue_type, "string");
    }

    #[test]
    fn test_optional_default_is_validated() {
        let schema = optional(number()).with_default(42);
        let dataset = run(&schema, Value::Undefined);
        assert!(dataset.is_success());
        assert_eq!(dataset.value, Value::from(42));

        let bad_default = optional(number()).with_default("nope");
        assert!(!run(&bad_default, Value::Undefined).typed);
    }

    #[test]
    fn test_nullable_and_nullish() {
        assert!(run(&nullable(string()), Value::Null).is_success());
        assert!(!run(&nullable(string()), Value::Undefined).typed);
        assert!(run(&nullish(string()), Value::Null).is_success());
        assert!(run(&nullish(string()), Value::Undefined).is_success());
    }

    #[test]
    fn test_non_optional_rejects_undefined() {
        let schema = non_optional(optional(string()));
        let dataset = run(&schema, Value::Undefined);
        let issue = &dataset.issues().unwrap()[0];
        assert_eq!(issue.issue_type, "non_optional");
        assert_eq!(
            issue.message,
            "Invalid type: Expected !undefined but received undefined"
        );
        assert!(run(&schema, Value::from("x")).is_success());
    }

    #[test]
    fn test_expectations() {
        assert_eq!(
            optional(string()).expects().as_deref(),
            Some("(string | undefined)")
        );
        assert_eq!(
            nullish(number()).expects().as_deref(),
            Some("(number | null | undefined)")
        );
    }

    #[tokio::test]
    async fn test_optional_async_delegates() {
        let schema = optional_async(string());
        let dataset = schema
            .run_async(Dataset::new(Value::Undefined), &Config::new())
            .await;
        assert!(dataset.is_success());
        let dataset = schema.run_async(Dataset::new(1), &Config::new()).await;
        assert!(!dataset.typed);
    }
}
