//! Sequential composition of a base schema with validation and
//! transformation steps.

use crate::core::{
    boxed, AsyncSchema, BoxedSchema, Config, Dataset, Describe, Identity, IntoSchemaRef, Kind,
    Message, Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use tracing::{debug, trace};

/// The abort policy that ends the pipe once `dataset` carries issues.
fn abort_reason(dataset: &Dataset, config: &Config) -> Option<&'static str> {
    if !dataset.has_issues() {
        None
    } else if config.abort_early() {
        Some("abort_early")
    } else if config.abort_pipe_early() {
        Some("abort_pipe_early")
    } else {
        None
    }
}

/// Whether a step of `step_kind` may still run on `dataset`.
///
/// Once issues are present no step may reshape the value (a schema or a
/// transformation). Validation steps keep running so every predicate gets
/// reported.
fn may_run(dataset: &Dataset, step_kind: Kind) -> bool {
    !dataset.has_issues() || step_kind == Kind::Validation
}

/// Ends the pipe at `step`, marking the dataset untyped.
fn halt(mut dataset: Dataset, base: &str, step: usize, reason: &'static str) -> Dataset {
    debug!(pipe.base = %base, pipe.step = step, pipe.reason = reason, "Pipe stopped");
    dataset.typed = false;
    dataset
}

/// A base schema followed by steps, each fed the previous step's dataset.
///
/// # Examples
///
/// ```rust
/// use shape_guard::actions::{min_length, trim};
/// use shape_guard::core::{Config, Dataset, Schema};
/// use shape_guard::schemas::{pipe, string};
///
/// let username = pipe(string()).step(trim()).step(min_length(3));
///
/// let ok = username.run(Dataset::new("  alice "), &Config::new());
/// assert!(ok.is_success());
/// assert_eq!(ok.value.as_str(), Some("alice"));
///
/// let short = username.run(Dataset::new(" al "), &Config::new());
/// assert_eq!(short.issues().unwrap()[0].issue_type, "min_length");
/// ```
#[derive(Debug, Clone)]
pub struct Pipe {
    base: BoxedSchema,
    steps: Vec<BoxedSchema>,
}

impl Pipe {
    /// Appends a step.
    pub fn step(mut self, step: impl Schema + 'static) -> Self {
        self.steps.push(boxed(step));
        self
    }

    pub fn base(&self) -> &BoxedSchema {
        &self.base
    }

    pub fn steps(&self) -> &[BoxedSchema] {
        &self.steps
    }
}

pub fn pipe(base: impl Schema + 'static) -> Pipe {
    Pipe {
        base: boxed(base),
        steps: Vec::new(),
    }
}

impl Describe for Pipe {
    fn kind(&self) -> Kind {
        self.base.kind()
    }

    fn type_tag(&self) -> &str {
        self.base.type_tag()
    }

    fn identity(&self) -> Identity {
        self.base.identity()
    }

    fn expects(&self) -> Option<String> {
        self.base.expects()
    }

    fn requirement(&self) -> Option<Value> {
        self.base.requirement()
    }

    fn message(&self) -> Option<&Message> {
        self.base.message()
    }
}

impl Schema for Pipe {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let dataset = self.base.run(dataset, config);
        if config.skip_pipe() {
            return dataset;
        }
        let base = self.base.type_tag();
        if let Some(reason) = abort_reason(&dataset, config) {
            return halt(dataset, base, 0, reason);
        }
        let mut dataset = dataset;
        for (index, step) in self.steps.iter().enumerate() {
            if !may_run(&dataset, step.kind()) {
                return halt(dataset, base, index, "issues before transformation");
            }
            trace!(pipe.step = index, step.type_tag = %step.type_tag(), "Running pipe step");
            dataset = step.run(dataset, config);
            if let Some(reason) = abort_reason(&dataset, config) {
                return halt(dataset, base, index + 1, reason);
            }
        }
        dataset
    }
}

/// The asynchronous pipe: steps may be awaited, and still run one at a time.
#[derive(Debug, Clone)]
pub struct PipeAsync {
    base: SchemaRef,
    steps: Vec<SchemaRef>,
}

impl PipeAsync {
    pub fn step(mut self, step: impl IntoSchemaRef) -> Self {
        self.steps.push(step.into_schema_ref());
        self
    }

    pub fn steps(&self) -> &[SchemaRef] {
        &self.steps
    }
}

pub fn pipe_async(base: impl IntoSchemaRef) -> PipeAsync {
    PipeAsync {
        base: base.into_schema_ref(),
        steps: Vec::new(),
    }
}

impl Describe for PipeAsync {
    fn kind(&self) -> Kind {
        self.base.kind()
    }

    fn type_tag(&self) -> &str {
        self.base.type_tag()
    }

    fn identity(&self) -> Identity {
        self.base.identity()
    }

    fn expects(&self) -> Option<String> {
        self.base.expects()
    }

    fn requirement(&self) -> Option<Value> {
        self.base.requirement()
    }

    fn message(&self) -> Option<&Message> {
        self.base.message()
    }

    fn is_async(&self) -> bool {
        true
    }
}

#[async_trait]
impl AsyncSchema for PipeAsync {
    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset {
        let dataset = self.base.run(dataset, config).await;
        if config.skip_pipe() {
            return dataset;
        }
        let base = self.base.type_tag();
        if let Some(reason) = abort_reason(&dataset, config) {
            return halt(dataset, base, 0, reason);
        }
        let mut dataset = dataset;
        for (index, step) in self.steps.iter().enumerate() {
            if !may_run(&dataset, step.kind()) {
                return halt(dataset, base, index, "issues before transformation");
            }
            trace!(pipe.step = index, step.type_tag = %step.type_tag(), "Running async pipe step");
            dataset = step.run(dataset, config).await;
            if let Some(reason) = abort_reason(&dataset, config) {
                return halt(dataset, base, index + 1, reason);
            }
        }
        dataset
    }
}

impl_into_schema_ref!(PipeAsync);
