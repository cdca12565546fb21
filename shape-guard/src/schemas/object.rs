//! Object schemas built over [`Entries`].

use super::entries::Entries;
use super::primitive::LiteralSchema;
use crate::core::{
    add_issue, boxed, AsyncSchema, BoxedSchema, ChildSchema, Config, ContainerType, Dataset,
    Describe, Identity, IssueDetails, Kind, Message, Object, PathChain, PathItem, PathOrigin,
    Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use futures::future::join_all;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::trace;

/// What an object schema does with keys that have no entry.
#[derive(Debug, Clone)]
pub enum UnknownKeys<S> {
    /// Dropped from the output
    Strip,
    /// Copied to the output unchanged
    Passthrough,
    /// Reported as a `key` issue
    Reject,
    /// Validated with a schema
    Rest(S),
}

impl<S> UnknownKeys<S> {
    fn name(&self) -> &'static str {
        match self {
            UnknownKeys::Strip => "object",
            UnknownKeys::Passthrough => "loose_object",
            UnknownKeys::Reject => "strict_object",
            UnknownKeys::Rest(_) => "object_with_rest",
        }
    }
}

/// Validates a plain object entry by entry.
///
/// Entries are visited in declaration order. A missing key is validated as
/// `undefined`, and stays absent from the output when its schema leaves it
/// undefined. Child issues get a path step for their key.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{boxed, Config, Dataset, Schema};
/// use shape_guard::schemas::{number, object, optional, string};
/// use serde_json::json;
///
/// let user = object([
///     ("name", boxed(string())),
///     ("age", boxed(optional(number()))),
/// ]);
///
/// let dataset = user.run(Dataset::new(json!({"name": 7, "extra": true})), &Config::new());
/// let issue = &dataset.issues().unwrap()[0];
/// assert_eq!(issue.dot_path().as_deref(), Some("name"));
/// assert_eq!(dataset.value.as_object().unwrap().keys().collect::<Vec<_>>(), vec!["name"]);
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema<S = BoxedSchema> {
    entries: Entries<S>,
    unknown: UnknownKeys<S>,
    message: Option<Message>,
}

pub type ObjectAsync = ObjectSchema<SchemaRef>;

impl<S: ChildSchema> ObjectSchema<S> {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn entries(&self) -> &Entries<S> {
        &self.entries
    }

    pub fn unknown_keys(&self) -> &UnknownKeys<S> {
        &self.unknown
    }

    fn with_entries(&self, entries: Entries<S>) -> Self {
        Self {
            entries,
            unknown: self.unknown.clone(),
            message: self.message.clone(),
        }
    }

    /// This schema with `other`'s entries laid over its own.
    pub fn merge(&self, other: &Entries<S>) -> Self {
        self.with_entries(self.entries.merge(other))
    }

    pub fn pick(&self, keys: &[&str]) -> Self {
        self.with_entries(self.entries.pick(keys))
    }

    pub fn omit(&self, keys: &[&str]) -> Self {
        self.with_entries(self.entries.omit(keys))
    }

    pub fn keyof(&self) -> LiteralSchema {
        self.entries.keyof()
    }

    /// Folds a child's result into `dataset` and `output`.
    #[allow(clippy::too_many_arguments)]
    fn absorb(
        dataset: &mut Dataset,
        output: &mut Object,
        container: &Arc<Value>,
        key: &str,
        present: bool,
        child_input: Value,
        mut child: Dataset,
        config: &Config,
    ) -> ControlFlow<()> {
        let item = || {
            PathItem::new(
                ContainerType::Object,
                PathOrigin::Value,
                Value::from(key),
                child_input,
                Arc::clone(container),
            )
        };
        dataset.absorb_child(&mut child, item, config.abort_early())?;
        if present || !child.value.is_undefined() {
            output.insert(key, child.value);
        }
        ControlFlow::Continue(())
    }

    /// Reports the first key without an entry, as strict objects do.
    fn reject_unknown(
        &self,
        dataset: &mut Dataset,
        container: &Arc<Value>,
        input: &Object,
        config: &Config,
    ) {
        let unknown = input
            .iter()
            .find(|(key, _)| !self.entries.contains_key(key));
        if let Some((key, value)) = unknown {
            let item = PathItem::new(
                ContainerType::Object,
                PathOrigin::Key,
                Value::from(key.as_str()),
                value.clone(),
                Arc::clone(container),
            );
            add_issue(
                self,
                "key",
                dataset,
                config,
                IssueDetails::new()
                    .input(Value::from(key.as_str()))
                    .expected("never")
                    .path(PathChain::single(item)),
            );
        }
    }

    fn copy_unknown(&self, output: &mut Object, input: &Object) {
        for (key, value) in input.iter() {
            if !self.entries.contains_key(key) {
                output.insert(key.clone(), value.clone());
            }
        }
    }

    fn unknown_pairs<'a>(
        &'a self,
        input: &'a Object,
    ) -> impl Iterator<Item = (&'a String, &'a Value)> {
        input
            .iter()
            .filter(move |(key, _)| !self.entries.contains_key(key))
    }
}

impl<S: ChildSchema> Describe for ObjectSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        self.unknown.name()
    }

    fn identity(&self) -> Identity {
        Identity::new(self.unknown.name())
    }

    fn expects(&self) -> Option<String> {
        Some("Object".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for ObjectSchema<BoxedSchema> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let container = dataset.share_value();
        let Some(input) = container.as_object() else {
            dataset.value = Arc::try_unwrap(container).unwrap_or_else(|shared| (*shared).clone());
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        };
        dataset.typed = true;
        let mut output = Object::new();

        for (key, schema) in self.entries.iter() {
            let present = input.contains_key(key);
            let child_input = input.get(key).cloned().unwrap_or_default();
            trace!(object.key = key, "Validating object entry");
            let child = schema.run(Dataset::new(child_input.clone()), config);
            let step = Self::absorb(
                &mut dataset,
                &mut output,
                &container,
                key,
                present,
                child_input,
                child,
                config,
            );
            if step.is_break() {
                dataset.value = Value::Object(output);
                return dataset;
            }
        }

        match &self.unknown {
            UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => self.copy_unknown(&mut output, input),
            UnknownKeys::Reject => self.reject_unknown(&mut dataset, &container, input, config),
            UnknownKeys::Rest(rest) => {
                for (key, value) in self.unknown_pairs(input) {
                    let child = rest.run(Dataset::new(value.clone()), config);
                    let step = Self::absorb(
                        &mut dataset,
                        &mut output,
                        &container,
                        key,
                        true,
                        value.clone(),
                        child,
                        config,
                    );
                    if step.is_break() {
                        break;
                    }
                }
            }
        }

        dataset.value = Value::Object(output);
        dataset
    }
}

#[async_trait]
impl AsyncSchema for ObjectSchema<SchemaRef> {
    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let container = dataset.share_value();
        let Some(input) = container.as_object() else {
            dataset.value = Arc::try_unwrap(container).unwrap_or_else(|shared| (*shared).clone());
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        };
        dataset.typed = true;
        let mut output = Object::new();

        let visits: Vec<(&str, bool, Value)> = self
            .entries
            .iter()
            .map(|(key, _)| {
                (
                    key,
                    input.contains_key(key),
                    input.get(key).cloned().unwrap_or_default(),
                )
            })
            .collect();
        let children = join_all(
            self.entries
                .iter()
                .zip(&visits)
                .map(|((_, schema), (_, _, value))| {
                    schema.run(Dataset::new(value.clone()), config)
                }),
        )
        .await;

        for ((key, present, child_input), child) in visits.into_iter().zip(children) {
            let step = Self::absorb(
                &mut dataset,
                &mut output,
                &container,
                key,
                present,
                child_input,
                child,
                config,
            );
            if step.is_break() {
                dataset.value = Value::Object(output);
                return dataset;
            }
        }

        match &self.unknown {
            UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => self.copy_unknown(&mut output, input),
            UnknownKeys::Reject => self.reject_unknown(&mut dataset, &container, input, config),
            UnknownKeys::Rest(rest) => {
                let pairs: Vec<_> = self.unknown_pairs(input).collect();
                let children = join_all(
                    pairs
                        .iter()
                        .map(|(_, value)| rest.run(Dataset::new((*value).clone()), config)),
                )
                .await;
                for ((key, value), child) in pairs.into_iter().zip(children) {
                    let step = Self::absorb(
                        &mut dataset,
                        &mut output,
                        &container,
                        key,
                        true,
                        value.clone(),
                        child,
                        config,
                    );
                    if step.is_break() {
                        break;
                    }
                }
            }
        }

        dataset.value = Value::Object(output);
        dataset
    }
}

impl_into_schema_ref!(ObjectSchema<SchemaRef>);

impl ObjectSchema<BoxedSchema> {
    /// This schema with every entry optional.
    pub fn partial(&self) -> Self {
        self.with_entries(self.entries.partial())
    }

    pub fn partial_keys(&self, keys: &[&str]) -> Self {
        self.with_entries(self.entries.partial_keys(keys))
    }

    pub fn required(&self) -> Self {
        self.with_entries(self.entries.required())
    }

    pub fn required_keys(&self, keys: &[&str]) -> Self {
        self.with_entries(self.entries.required_keys(keys))
    }
}

impl ObjectSchema<SchemaRef> {
    pub fn partial(&self) -> Self {
        self.with_entries(self.entries.partial())
    }

    pub fn required(&self) -> Self {
        self.with_entries(self.entries.required())
    }
}

fn build<S: Clone, K: Into<String>>(
    entries: impl IntoIterator<Item = (K, S)>,
    unknown: UnknownKeys<S>,
) -> ObjectSchema<S> {
    ObjectSchema {
        entries: entries.into_iter().collect(),
        unknown,
        message: None,
    }
}

/// An object schema that strips unknown keys.
pub fn object<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, BoxedSchema)>,
) -> ObjectSchema<BoxedSchema> {
    build(entries, UnknownKeys::Strip)
}

/// An object schema that keeps unknown keys as they are.
pub fn loose_object<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, BoxedSchema)>,
) -> ObjectSchema<BoxedSchema> {
    build(entries, UnknownKeys::Passthrough)
}

/// An object schema that reports the first unknown key.
pub fn strict_object<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, BoxedSchema)>,
) -> ObjectSchema<BoxedSchema> {
    build(entries, UnknownKeys::Reject)
}

/// An object schema that validates unknown keys against `rest`.
pub fn object_with_rest<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, BoxedSchema)>,
    rest: impl Schema + 'static,
) -> ObjectSchema<BoxedSchema> {
    build(entries, UnknownKeys::Rest(boxed(rest)))
}

/// The async object schema; children may be sync or async and are started
/// together.
pub fn object_async<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, SchemaRef)>,
) -> ObjectAsync {
    build(entries, UnknownKeys::Strip)
}

pub fn loose_object_async<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, SchemaRef)>,
) -> ObjectAsync {
    build(entries, UnknownKeys::Passthrough)
}

pub fn strict_object_async<K: Into<String>>(
    entries: impl IntoIterator<Item = (K, SchemaRef)>,
) -> ObjectAsync {
    build(entries, UnknownKeys::Reject)
}
