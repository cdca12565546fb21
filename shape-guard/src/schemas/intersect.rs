//! Intersection schemas: the input must satisfy every option, and the
//! options' outputs are deep-merged into one value.

use super::primitive::join_expects;
use crate::core::{
    add_issue, merge_values, AsyncSchema, BoxedSchema, ChildSchema, Config, Dataset, Describe,
    Identity, IntoSchemaRef, IssueDetails, Kind, Message, Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

/// Runs every option on the same input and merges their outputs with
/// [`merge_values`].
///
/// Issues from all options are collected in option order. If every option
/// produced a typed value the outputs are merged left to right; a merge
/// conflict adds a single `intersect` issue and the dataset keeps the input.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{boxed, Config, Dataset, Schema};
/// use shape_guard::schemas::{intersect, loose_object, number, string};
/// use serde_json::json;
///
/// let schema = intersect(vec![
///     boxed(loose_object([("name", boxed(string()))])),
///     boxed(loose_object([("age", boxed(number()))])),
/// ]);
/// let dataset = schema.run(Dataset::new(json!({"name": "Ada", "age": 36})), &Config::new());
/// assert!(dataset.is_success());
/// ```
#[derive(Debug, Clone)]
pub struct IntersectSchema<S> {
    options: Vec<S>,
    message: Option<Message>,
}

pub type IntersectAsync = IntersectSchema<SchemaRef>;

impl<S> IntersectSchema<S> {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn options(&self) -> &[S] {
        &self.options
    }
}

impl<S: ChildSchema> IntersectSchema<S> {
    /// Folds the options' results into `dataset`. `results` is in option
    /// order and may stop short under `abort_early`.
    fn combine(&self, mut dataset: Dataset, results: Vec<Dataset>, config: &Config) -> Dataset {
        if self.options.is_empty() {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        }

        let mut typed = results.len() == self.options.len();
        let mut outputs = Vec::with_capacity(results.len());
        for mut result in results {
            typed &= result.typed;
            dataset.extend_issues(result.take_issues().unwrap_or_default());
            outputs.push(result.value);
        }
        if !typed {
            dataset.typed = false;
            return dataset;
        }

        let mut outputs = outputs.into_iter();
        let mut merged = outputs.next().unwrap_or(Value::Undefined);
        for output in outputs {
            match merge_values(merged, output) {
                Ok(value) => merged = value,
                Err(conflict) => {
                    debug!(intersect.conflict = %conflict, "Intersection outputs conflict");
                    add_issue(
                        self,
                        "type",
                        &mut dataset,
                        config,
                        IssueDetails::new().received("unknown"),
                    );
                    return dataset;
                }
            }
        }
        dataset.typed = true;
        dataset.value = merged;
        dataset
    }
}

impl<S: ChildSchema> Describe for IntersectSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "intersect"
    }

    fn identity(&self) -> Identity {
        Identity::new("intersect")
    }

    fn expects(&self) -> Option<String> {
        let expects = self
            .options
            .iter()
            .map(|option| option.expects().unwrap_or_else(|| "unknown".to_string()))
            .collect();
        Some(join_expects(expects, "&"))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for IntersectSchema<BoxedSchema> {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let mut results = Vec::with_capacity(self.options.len());
        for option in &self.options {
            let result = option.run(dataset.fresh(), config);
            let failed = result.has_issues();
            results.push(result);
            if failed && config.abort_early() {
                break;
            }
        }
        self.combine(dataset, results, config)
    }
}

#[async_trait]
impl AsyncSchema for IntersectSchema<SchemaRef> {
    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset {
        let attempts = self
            .options
            .iter()
            .map(|option| option.run(dataset.fresh(), config));
        let mut results = join_all(attempts).await;
        if config.abort_early() {
            if let Some(first_failure) = results.iter().position(Dataset::has_issues) {
                results.truncate(first_failure + 1);
            }
        }
        self.combine(dataset, results, config)
    }
}

impl_into_schema_ref!(IntersectSchema<SchemaRef>);

pub fn intersect(options: Vec<BoxedSchema>) -> IntersectSchema<BoxedSchema> {
    IntersectSchema {
        options,
        message: None,
    }
}

pub fn intersect_async<I>(options: I) -> IntersectAsync
where
    I: IntoIterator,
    I::Item: IntoSchemaRef,
{
    IntersectSchema {
        options: options.into_iter().map(IntoSchemaRef::into_schema_ref).collect(),
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::transform;
    use crate::core::boxed;
    use crate::schemas::{custom_async, literal, loose_object, number, pipe, string};
    use futures::FutureExt;
    use serde_json::json;

    fn run(schema: &impl Schema, value: serde_json::Value) -> Dataset {
        schema.run(Dataset::new(value), &Config::new())
    }

    #[test]
    fn test_merges_object_outputs() {
        let schema = intersect(vec![
            boxed(loose_object([("a", boxed(number()))])),
            boxed(loose_object([("b", boxed(string()))])),
        ]);
        let dataset = run(&schema, json!({"a": 1, "b": "x"}));
        assert!(dataset.is_success());
        assert_eq!(dataset.value, Value::from(json!({"a": 1, "b": "x"})));
    }

    #[test]
    fn test_collects_issues_from_every_option() {
        let schema = intersect(vec![boxed(string()), boxed(literal("x")), boxed(number())]);
        let dataset = run(&schema, json!(true));
        let types: Vec<_> = dataset
            .issues()
            .unwrap()
            .iter()
            .map(|i| i.issue_type.as_str())
            .collect();
        assert_eq!(types, vec!["string", "literal", "number"]);
        assert!(!dataset.typed);
    }

    #[test]
    fn test_abort_early_stops_at_first_failing_option() {
        let schema = intersect(vec![boxed(string()), boxed(number())]);
        let dataset = schema.run(Dataset::new(true), &Config::new().with_abort_early(true));
        assert_eq!(dataset.issue_count(), 1);
    }

    #[test]
    fn test_conflicting_outputs_report_one_issue() {
        let schema = intersect(vec![
            boxed(pipe(number()).step(transform(|_| Value::from(1)))),
            boxed(pipe(number()).step(transform(|_| Value::from(2)))),
        ]);
        let dataset = run(&schema, json!(0));
        assert!(!dataset.typed);
        let issues = dataset.issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "intersect");
        assert_eq!(issues[0].received, "unknown");
        assert!(issues[0].issues.is_none());
        assert_eq!(dataset.value, Value::from(0));
    }

    #[test]
    fn test_empty_intersection_fails() {
        let dataset = run(&intersect(vec![]), json!(1));
        assert!(!dataset.typed);
        assert_eq!(dataset.issues().unwrap()[0].expected.as_deref(), Some("never"));
    }

    #[tokio::test]
    async fn test_intersect_async_keeps_option_order() {
        let schema = intersect_async(vec![
            custom_async(|_| {
                async {
                    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    false
                }
                .boxed()
            })
            .into_schema_ref(),
            string().into_schema_ref(),
        ]);
        let dataset = schema.run_async(Dataset::new(1), &Config::new()).await;
        let types: Vec<_> = dataset
            .issues()
            .unwrap()
            .iter()
            .map(|i| i.issue_type.clone())
            .collect();
        assert_eq!(types, vec!["custom", "string"]);
    }
}
