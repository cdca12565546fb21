//! First-match resolution over an ordered list of candidate schemas.

use super::primitive::join_expects;
use crate::core::{
    add_issue, AsyncSchema, BoxedSchema, ChildSchema, Config, Dataset, Describe, Identity,
    IntoSchemaRef, Issue, IssueDetails, Kind, Message, Schema, SchemaRef,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use tracing::debug;

/// Accepts the input if any candidate does.
///
/// Candidates are tried in declaration order, each on a fresh copy of the
/// input. The first typed result is returned as is. When every candidate
/// fails, a single `union` issue is reported whose sub-issues are the
/// candidates' issues in candidate order.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{boxed, Config, Dataset, Schema, Value};
/// use shape_guard::schemas::{number, string, union};
///
/// let schema = union(vec![boxed(string()), boxed(number())]);
///
/// let ok = schema.run(Dataset::new(123), &Config::new());
/// assert!(ok.is_success());
///
/// let failed = schema.run(Dataset::new(true), &Config::new());
/// let issue = &failed.issues().unwrap()[0];
/// assert_eq!(issue.message, "Invalid type: Expected (string | number) but received true");
/// assert_eq!(issue.issues.as_ref().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UnionSchema<S> {
    options: Vec<S>,
    message: Option<Message>,
}

pub type UnionAsync = UnionSchema<SchemaRef>;

impl<S> UnionSchema<S> {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn options(&self) -> &[S] {
        &self.options
    }
}

impl<S: ChildSchema> UnionSchema<S> {
    /// Reports the aggregated failure on `dataset`.
    fn fail(&self, mut dataset: Dataset, failures: Vec<Issue>, config: &Config) -> Dataset {
        debug!(
            union.options = self.options.len(),
            union.issues = failures.len(),
            "No union candidate matched"
        );
        add_issue(
            self,
            "type",
            &mut dataset,
            config,
            IssueDetails::new().issues(failures),
        );
        dataset
    }
}

impl<S: ChildSchema> Describe for UnionSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "union"
    }

    fn identity(&self) -> Identity {
        Identity::new("union")
    }

    fn expects(&self) -> Option<String> {
        let expects = self
            .options
            .iter()
            .map(|option| option.expects().unwrap_or_else(|| "unknown".to_string()))
            .collect();
        Some(join_expects(expects, "|"))
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for UnionSchema<BoxedSchema> {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let mut failures = Vec::new();
        for option in &self.options {
            let mut attempt = option.run(dataset.fresh(), config);
            if attempt.typed {
                return attempt;
            }
            failures.extend(attempt.take_issues().unwrap_or_default());
        }
        self.fail(dataset, failures, config)
    }
}

#[async_trait]
impl AsyncSchema for UnionSchema<SchemaRef> {
    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset {
        let mut failures = Vec::new();
        for option in &self.options {
            let mut attempt = option.run(dataset.fresh(), config).await;
            if attempt.typed {
                return attempt;
            }
            failures.extend(attempt.take_issues().unwrap_or_default());
        }
        self.fail(dataset, failures, config)
    }
}

impl_into_schema_ref!(UnionSchema<SchemaRef>);

pub fn union(options: Vec<BoxedSchema>) -> UnionSchema<BoxedSchema> {
    UnionSchema {
        options,
        message: None,
    }
}

pub fn union_async<I>(options: I) -> UnionAsync
where
    I: IntoIterator,
    I::Item: IntoSchemaRef,
{
    UnionSchema {
        options: options.into_iter().map(IntoSchemaRef::into_schema_ref).collect(),
        message: None,
    }
}
