//! Validation steps defined by caller-supplied predicates.

use crate::core::{
    add_issue, AsyncSchema, Config, Dataset, Describe, Identity, IssueDetails, Kind, Message,
    Schema, Value,
};
use crate::impl_into_schema_ref;
use crate::schemas::{AsyncPredicate, Predicate};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Reports `message` whenever the predicate rejects a typed value.
#[derive(Clone)]
pub struct CheckAction {
    predicate: Arc<Predicate>,
    message: Message,
}

impl fmt::Debug for CheckAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckAction")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Describe for CheckAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_tag(&self) -> &str {
        "check"
    }

    fn identity(&self) -> Identity {
        Identity::new("check")
    }

    fn message(&self) -> Option<&Message> {
        Some(&self.message)
    }
}

impl Schema for CheckAction {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.typed && !(self.predicate)(&dataset.value) {
            add_issue(self, "input", &mut dataset, config, IssueDetails::new());
        }
        dataset
    }
}

/// ```rust
/// use shape_guard::actions::check;
/// use shape_guard::core::{Config, Dataset, Schema};
/// use shape_guard::schemas::{number, pipe};
///
/// let even = pipe(number()).step(check(|v| v.as_f64().map_or(false, |n| n % 2.0 == 0.0), "must be even"));
/// let dataset = even.run(Dataset::new(3), &Config::new());
/// assert_eq!(dataset.issues().unwrap()[0].message, "must be even");
/// ```
pub fn check(
    predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    message: impl Into<Message>,
) -> CheckAction {
    CheckAction {
        predicate: Arc::new(predicate),
        message: message.into(),
    }
}

/// Like [`CheckAction`], with a predicate that must be awaited.
#[derive(Clone)]
pub struct CheckAsyncAction {
    predicate: Arc<AsyncPredicate>,
    message: Message,
}

impl fmt::Debug for CheckAsyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckAsyncAction")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Describe for CheckAsyncAction {
    fn kind(&self) -> Kind {
        Kind::Validation
    }

    fn type_tag(&self) -> &str {
        "check"
    }

    fn identity(&self) -> Identity {
        Identity::new("check_async")
    }

    fn message(&self) -> Option<&Message> {
        Some(&self.message)
    }

    fn is_async(&self) -> bool {
        true
    }
}

#[async_trait]
impl AsyncSchema for CheckAsyncAction {
    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.typed && !(self.predicate)(dataset.value.clone()).await {
            add_issue(self, "input", &mut dataset, config, IssueDetails::new());
        }
        dataset
    }
}

impl_into_schema_ref!(CheckAsyncAction);

pub fn check_async(
    predicate: impl Fn(Value) -> BoxFuture<'static, bool> + Send + Sync + 'static,
    message: impl Into<Message>,
) -> CheckAsyncAction {
    CheckAsyncAction {
        predicate: Arc::new(predicate),
        message: message.into(),
    }
}
