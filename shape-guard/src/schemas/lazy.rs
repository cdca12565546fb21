//! Schemas resolved from the input at run time, for recursive shapes.

use crate::core::{
    add_issue, AsyncSchema, BoxedSchema, ChildSchema, Config, Dataset, Describe, Identity,
    IssueDetails, Kind, Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

type Getter<S> = dyn Fn(&Value) -> S + Send + Sync;

/// Defers to the schema returned by a getter called with the input.
///
/// Every resolution counts one level against [`Config::max_depth`]; past the
/// limit a `lazy` issue is reported instead of recursing further.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{boxed, BoxedSchema, Config, Dataset, Schema};
/// use shape_guard::schemas::{array, lazy, number, union};
///
/// fn tree() -> BoxedSchema {
///     boxed(union(vec![boxed(number()), boxed(array(lazy(|_| tree())))]))
/// }
///
/// let value = serde_json::json!([1, [2, [3]]]);
/// assert!(tree().run(Dataset::new(value), &Config::new()).is_success());
/// ```
pub struct LazySchema<S> {
    getter: Arc<Getter<S>>,
}

pub type LazyAsync = LazySchema<SchemaRef>;

impl<S> Clone for LazySchema<S> {
    fn clone(&self) -> Self {
        Self {
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<S> fmt::Debug for LazySchema<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySchema").finish_non_exhaustive()
    }
}

impl<S> LazySchema<S> {
    /// Resolves the schema for `value`, or reports the depth overrun.
    fn resolve(&self, dataset: &mut Dataset, config: &Config) -> Option<(S, Config)> {
        if config.depth() >= config.max_depth() {
            warn!(
                lazy.depth = config.depth(),
                lazy.max_depth = config.max_depth(),
                "Lazy schema exceeded maximum depth"
            );
            let expected = format!("<={}", config.max_depth());
            add_issue(
                &DepthGuard,
                "depth",
                dataset,
                config,
                IssueDetails::new()
                    .expected(expected)
                    .received(config.depth().to_string()),
            );
            return None;
        }
        Some(((self.getter)(&dataset.value), config.descend()))
    }
}

/// Issue context for depth overruns.
#[derive(Debug)]
struct DepthGuard;

impl Describe for DepthGuard {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "lazy"
    }

    fn identity(&self) -> Identity {
        Identity::new("lazy")
    }
}

impl<S: ChildSchema> Describe for LazySchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "lazy"
    }

    fn identity(&self) -> Identity {
        Identity::new("lazy")
    }

    fn expects(&self) -> Option<String> {
        Some("unknown".to_string())
    }

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for LazySchema<BoxedSchema> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        match self.resolve(&mut dataset, config) {
            Some((schema, nested)) => schema.run(dataset, &nested),
            None => dataset,
        }
    }
}

#[async_trait]
impl AsyncSchema for LazySchema<SchemaRef> {
    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        match self.resolve(&mut dataset, config) {
            Some((schema, nested)) => schema.run(dataset, &nested).await,
            None => dataset,
        }
    }
}

impl_into_schema_ref!(LazySchema<SchemaRef>);

pub fn lazy(
    getter: impl Fn(&Value) -> BoxedSchema + Send + Sync + 'static,
) -> LazySchema<BoxedSchema> {
    LazySchema {
        getter: Arc::new(getter),
    }
}

pub fn lazy_async(getter: impl Fn(&Value) -> SchemaRef + Send + Sync + 'static) -> LazyAsync {
    LazySchema {
        getter: Arc::new(getter),
    }
}
