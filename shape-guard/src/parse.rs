//! The validation boundary: run a schema over an input and hand back a
//! result that downstream code can consume.
//!
//! Every entry point resolves its config the same way: the call-local config
//! (if any) is merged over the global config of the registry it names, or of
//! [`Registry::shared`] when it names none.

use crate::core::{AsyncSchema, Config, Dataset, Issue, Registry, Schema, Value};
use crate::error::{Result, ShapeError, ValiError};
use crate::log_issue;
use crate::logging::{truncate_field, LogConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// The outcome of [`safe_parse`].
#[derive(Debug, Clone, Serialize)]
pub struct SafeParseResult {
    /// Whether the output has the schema's shape. May be true alongside
    /// validation issues.
    pub typed: bool,
    /// Typed and free of issues.
    pub success: bool,
    pub output: Value,
    /// The issues, in the order they were produced. `None` on success.
    pub issues: Option<Vec<Issue>>,
}

impl SafeParseResult {
    fn from_dataset(dataset: Dataset) -> Self {
        let success = dataset.is_success();
        let typed = dataset.typed;
        let output = dataset.value.clone();
        Self {
            typed,
            success,
            output,
            issues: dataset.into_issues(),
        }
    }

    /// Converts into the output value, or the issues as an error.
    pub fn into_result(self) -> Result<Value> {
        match self.issues.and_then(ValiError::new) {
            Some(error) => Err(ShapeError::Validation(error)),
            None => Ok(self.output),
        }
    }

    /// Emits one event per issue, honouring `log`'s verbosity.
    pub fn log_issues(&self, log: &LogConfig) {
        for issue in self.issues.iter().flatten() {
            log_issue!(
                log,
                issue.type_tag = %issue.issue_type,
                issue.path = ?issue.dot_path(),
                issue.input = %truncate_field(&issue.input.to_string(), log.max_field_length),
                "{}",
                truncate_field(&issue.message, log.max_field_length)
            );
        }
    }
}

fn resolve(config: Option<&Config>) -> Config {
    let registry = config.map_or_else(Registry::shared, Config::registry);
    registry.resolve_config(config)
}

/// Validates `input` and reports the outcome as data. Never fails.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::boxed;
/// use shape_guard::parse::safe_parse;
/// use shape_guard::schemas::{number, object, string};
/// use serde_json::json;
///
/// let schema = object([("id", boxed(number())), ("name", boxed(string()))]);
/// let result = safe_parse(&schema, json!({"id": 1, "name": 2}), None);
/// assert!(!result.success);
/// assert_eq!(result.issues.unwrap()[0].dot_path().as_deref(), Some("name"));
/// ```
#[instrument(skip_all, fields(schema.type_tag = %schema.type_tag()))]
pub fn safe_parse<S: Schema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
    config: Option<&Config>,
) -> SafeParseResult {
    let config = resolve(config);
    let dataset = schema.run(Dataset::new(input), &config);
    debug!(
        dataset.typed = dataset.typed,
        dataset.issues = dataset.issue_count(),
        "Validation finished"
    );
    SafeParseResult::from_dataset(dataset)
}

#[instrument(skip_all, fields(schema.type_tag = %schema.type_tag()))]
pub async fn safe_parse_async<S: AsyncSchema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
    config: Option<&Config>,
) -> SafeParseResult {
    let config = resolve(config);
    let dataset = schema.run_async(Dataset::new(input), &config).await;
    debug!(
        dataset.typed = dataset.typed,
        dataset.issues = dataset.issue_count(),
        "Async validation finished"
    );
    SafeParseResult::from_dataset(dataset)
}

/// Validates `input`, returning the output value or
/// [`ShapeError::Validation`] when any issue was raised.
pub fn parse<S: Schema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
    config: Option<&Config>,
) -> Result<Value> {
    safe_parse(schema, input, config).into_result()
}

pub async fn parse_async<S: AsyncSchema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
    config: Option<&Config>,
) -> Result<Value> {
    safe_parse_async(schema, input, config).await.into_result()
}

/// Validates `input` and deserializes the output into `T`.
///
/// ```rust
/// use serde::Deserialize;
/// use shape_guard::actions::trim;
/// use shape_guard::core::boxed;
/// use shape_guard::parse::parse_as;
/// use shape_guard::schemas::{number, object, pipe, string};
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// let schema = object([
///     ("id", boxed(number())),
///     ("name", boxed(pipe(string()).step(trim()))),
/// ]);
/// let user: User = parse_as(&schema, json!({"id": 7, "name": " Ada "}), None).unwrap();
/// assert_eq!((user.id, user.name.as_str()), (7, "Ada"));
/// ```
pub fn parse_as<T: DeserializeOwned, S: Schema + ?Sized>(
    schema: &S,
    input: impl Into<Value>,
    config: Option<&Config>,
) -> Result<T> {
    let output = parse(schema, input, config)?;
    serde_json::from_value(output.to_json()).map_err(|error| ShapeError::TypeMismatch {
        expected: std::any::type_name::<T>().to_string(),
        found: truncate_field(&output.received(), LogConfig::default().max_field_length),
        reason: error.to_string(),
    })
}

/// Whether `input` passes `schema` without issues. Stops at the first issue.
pub fn is<S: Schema + ?Sized>(schema: &S, input: impl Into<Value>) -> bool {
    let config = Config::new().with_abort_early(true).merged_over(&resolve(None));
    let dataset = schema.run(Dataset::new(input), &config);
    dataset.is_success()
}

/// Issue messages grouped by where they occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatErrors {
    /// Messages of issues about the input itself
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub root: Vec<String>,
    /// Messages keyed by dot path, such as `"user.tags.0"`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub nested: BTreeMap<String, Vec<String>>,
    /// Messages of nested issues whose path has no dot form
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<String>,
}

/// Groups `issues` by path. Sub-issues of aggregate failures are not
/// descended into.
pub fn flatten(issues: &[Issue]) -> FlatErrors {
    let mut flat = FlatErrors::default();
    for issue in issues {
        if issue.path_chain().is_empty() {
            flat.root.push(issue.message.clone());
        } else if let Some(path) = issue.dot_path() {
            flat.nested
                .entry(path)
                .or_default()
                .push(issue.message.clone());
        } else {
            flat.other.push(issue.message.clone());
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::min_length;
    use crate::core::{boxed, IntoSchemaRef};
    use crate::schemas::{map, number, object, object_async, pipe, string};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_safe_parse_success() {
        let result = safe_parse(&string(), "hi", None);
        assert!(result.typed && result.success);
        assert!(result.issues.is_none());
        assert_eq!(result.output, Value::from("hi"));
    }

    #[test]
    fn test_safe_parse_keeps_typed_output_with_validation_issues() {
        let schema = pipe(string()).step(min_length(3));
        let result = safe_parse(&schema, "ab", None);
        assert!(result.typed);
        assert!(!result.success);
        assert_eq!(result.issues.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_parse_returns_validation_error() {
        let err = parse(&number(), "1", None).unwrap_err();
        assert_eq!(err.issues().map(<[Issue]>::len), Some(1));
        assert_eq!(
            err.to_string(),
            "Validation failed: Invalid type: Expected number but received \"1\""
        );
        assert_eq!(parse(&number(), 1, None).unwrap(), Value::from(1));
    }

    #[test]
    fn test_config_resolves_against_named_registry() {
        let registry = Arc::new(Registry::new());
        registry.set_global_config(Config::new().with_abort_early(true));
        let schema = object([("a", boxed(string())), ("b", boxed(string()))]);
        let local = Config::new().with_registry(Arc::clone(&registry));

        let result = safe_parse(&schema, json!({"a": 1, "b": 2}), Some(&local));
        assert_eq!(result.issues.unwrap().len(), 1);

        let local = local.with_abort_early(false);
        let result = safe_parse(&schema, json!({"a": 1, "b": 2}), Some(&local));
        assert_eq!(result.issues.unwrap().len(), 2);
    }

    #[test]
    fn test_parse_as_deserializes_output() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Point {
            x: f64,
            y: f64,
        }
        let schema = object([("x", boxed(number())), ("y", boxed(number()))]);
        let point: Point = parse_as(&schema, json!({"x": 1, "y": 2.5, "z": 0}), None).unwrap();
        assert_eq!(point, Point { x: 1.0, y: 2.5 });

        let mismatch = parse_as::<Vec<String>, _>(&number(), 1, None);
        match mismatch {
            Err(ShapeError::TypeMismatch { expected, found, .. }) => {
                assert!(expected.contains("Vec"));
                assert_eq!(found, "1");
            }
            other => panic!("expected a type mismatch, got {other:?}"),
        }

        let only_x = object([("x", boxed(number()))]);
        let missing = parse_as::<Point, _>(&only_x, json!({"x": 1}), None);
        assert!(matches!(
            missing,
            Err(ShapeError::TypeMismatch { ref reason, .. }) if reason.contains("missing field")
        ));
    }

    #[test]
    fn test_is() {
        assert!(is(&string(), "x"));
        assert!(!is(&string(), 1));
        assert!(!is(&pipe(string()).step(min_length(2)), "x"));
    }

    #[test]
    fn test_flatten_groups_by_path() {
        let schema = object([
            ("name", boxed(pipe(string()).step(min_length(2)))),
            ("tags", boxed(map(number(), string()))),
        ]);
        let pairs = vec![(Value::Bool(true), Value::from("x"))];
        let input = Value::Object(
            [("name", Value::from("a")), ("tags", Value::Map(pairs))]
                .into_iter()
                .collect(),
        );
        let result = safe_parse(&schema, input, None);
        let flat = flatten(result.issues.as_deref().unwrap());
        assert!(flat.root.is_empty());
        assert_eq!(
            flat.nested.get("name").map(Vec::len),
            Some(1),
            "nested: {:?}",
            flat.nested
        );
        assert_eq!(flat.other.len(), 1);

        let root = flatten(safe_parse(&number(), "x", None).issues.as_deref().unwrap());
        assert_eq!(root.root.len(), 1);
    }

    #[tokio::test]
    async fn test_safe_parse_async() {
        let schema = object_async([("a", number().into_schema_ref())]);
        let result = safe_parse_async(&schema, json!({"a": "x"}), None).await;
        assert!(!result.success);
        assert!(parse_async(&schema, json!({"a": 1}), None).await.is_ok());
    }
}
