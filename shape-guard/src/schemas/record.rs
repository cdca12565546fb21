//! Keyed collections: records (plain objects with uniform entries), maps
//! and sets.

use crate::core::{
    add_issue, boxed, AsyncSchema, BoxedSchema, ChildSchema, Config, ContainerType, Dataset,
    Describe, Identity, IntoSchemaRef, IssueDetails, Kind, Message, Object, PathItem, PathOrigin,
    Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use futures::future::{join, join_all};
use std::ops::ControlFlow;
use std::sync::Arc;

/// Folds the key and value results of one pair into the container.
///
/// Returns the pair to insert when both halves are usable, or `Break` under
/// `abort_early`.
fn absorb_pair(
    dataset: &mut Dataset,
    container_type: ContainerType,
    container: &Arc<Value>,
    (key, value): (&Value, &Value),
    (mut key_result, mut value_result): (Dataset, Dataset),
    config: &Config,
) -> ControlFlow<(), Option<(Value, Value)>> {
    let path = |origin: PathOrigin| {
        PathItem::new(
            container_type,
            origin,
            key.clone(),
            value.clone(),
            Arc::clone(container),
        )
    };
    dataset.absorb_child(&mut key_result, || path(PathOrigin::Key), config.abort_early())?;
    dataset.absorb_child(&mut value_result, || path(PathOrigin::Value), config.abort_early())?;
    if key_result.typed {
        ControlFlow::Continue(Some((key_result.value, value_result.value)))
    } else {
        ControlFlow::Continue(None)
    }
}

fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Validates every key and value of a plain object.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{Config, Dataset, Schema};
/// use shape_guard::schemas::{number, picklist, record};
/// use serde_json::json;
///
/// let scores = record(picklist(["alice", "bob"]), number());
/// assert!(scores.run(Dataset::new(json!({"alice": 3})), &Config::new()).is_success());
///
/// let dataset = scores.run(Dataset::new(json!({"eve": 1})), &Config::new());
/// assert_eq!(dataset.issues().unwrap()[0].issue_type, "picklist");
/// ```
#[derive(Debug, Clone)]
pub struct RecordSchema<S = BoxedSchema> {
    key: S,
    value: S,
    message: Option<Message>,
}

pub type RecordAsync = RecordSchema<SchemaRef>;

impl<S> RecordSchema<S> {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<S: ChildSchema> Describe for RecordSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "record"
    }

    fn identity(&self) -> Identity {
        Identity::new("record")
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

impl<S: ChildSchema> RecordSchema<S> {
    fn assemble(
        &self,
        mut dataset: Dataset,
        pairs: Vec<(Value, Value)>,
        results: Vec<(Dataset, Dataset)>,
        config: &Config,
    ) -> Dataset {
        let container = dataset.share_value();
        dataset.typed = true;
        let mut output = Object::new();
        for ((key, value), results) in pairs.iter().zip(results) {
            let step = absorb_pair(
                &mut dataset,
                ContainerType::Record,
                &container,
                (key, value),
                results,
                config,
            );
            match step {
                ControlFlow::Break(()) => break,
                ControlFlow::Continue(Some((key, value))) => {
                    output.insert(key_string(key), value);
                }
                ControlFlow::Continue(None) => {}
            }
        }
        dataset.value = Value::Object(output);
        dataset
    }
}

fn object_pairs(object: &Object) -> Vec<(Value, Value)> {
    object
        .iter()
        .map(|(k, v)| (Value::from(k.as_str()), v.clone()))
        .collect()
}

impl Schema for RecordSchema<BoxedSchema> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let pairs = match dataset.value.as_object() {
            Some(object) => object_pairs(object),
            None => {
                add_issue(self, "type", &mut dataset, config, IssueDetails::new());
                return dataset;
            }
        };
        let mut results = Vec::with_capacity(pairs.len());
        for (key, value) in &pairs {
            let key_result = self.key.run(Dataset::new(key.clone()), config);
            let value_result = self.value.run(Dataset::new(value.clone()), config);
            let failed = key_result.has_issues() || value_result.has_issues();
            results.push((key_result, value_result));
            if failed && config.abort_early() {
                break;
            }
        }
        self.assemble(dataset, pairs, results, config)
    }
}

#[async_trait]
impl AsyncSchema for RecordSchema<SchemaRef> {
    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let pairs = match dataset.value.as_object() {
            Some(object) => object_pairs(object),
            None => {
                add_issue(self, "type", &mut dataset, config, IssueDetails::new());
                return dataset;
            }
        };
        let results = join_all(pairs.iter().map(|(key, value)| {
            join(
                self.key.run(Dataset::new(key.clone()), config),
                self.value.run(Dataset::new(value.clone()), config),
            )
        }))
        .await;
        self.assemble(dataset, pairs, results, config)
    }
}

impl_into_schema_ref!(RecordSchema<SchemaRef>);

pub fn record(
    key: impl Schema + 'static,
    value: impl Schema + 'static,
) -> RecordSchema<BoxedSchema> {
    RecordSchema {
        key: boxed(key),
        value: boxed(value),
        message: None,
    }
}

pub fn record_async(key: impl IntoSchemaRef, value: impl IntoSchemaRef) -> RecordAsync {
    RecordSchema {
        key: key.into_schema_ref(),
        value: value.into_schema_ref(),
        message: None,
    }
}

/// Validates every key and value of a [`Value::Map`].
#[derive(Debug, Clone)]
pub struct MapSchema {
    key: BoxedSchema,
    value: BoxedSchema,
    message: Option<Message>,
}

impl MapSchema {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Describe for MapSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "map"
    }

    fn identity(&self) -> Identity {
        Identity::new("map")
    }

    fn expects(&self) -> Option<String> {
        Some("Map".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for MapSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !matches!(dataset.value, Value::Map(_)) {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        }
        let container = dataset.share_value();
        let pairs = match container.as_ref() {
            Value::Map(pairs) => pairs.as_slice(),
            _ => &[],
        };
        dataset.typed = true;
        let mut output = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let results = (
                self.key.run(Dataset::new(key.clone()), config),
                self.value.run(Dataset::new(value.clone()), config),
            );
            let step = absorb_pair(
                &mut dataset,
                ContainerType::Map,
                &container,
                (key, value),
                results,
                config,
            );
            match step {
                ControlFlow::Break(()) => break,
                ControlFlow::Continue(Some(pair)) => output.push(pair),
                ControlFlow::Continue(None) => {}
            }
        }
        dataset.value = Value::Map(output);
        dataset
    }
}

pub fn map(key: impl Schema + 'static, value: impl Schema + 'static) -> MapSchema {
    MapSchema {
        key: boxed(key),
        value: boxed(value),
        message: None,
    }
}

/// Validates every member of a [`Value::Set`].
#[derive(Debug, Clone)]
pub struct SetSchema {
    value: BoxedSchema,
    message: Option<Message>,
}

impl SetSchema {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Describe for SetSchema {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "set"
    }

    fn identity(&self) -> Identity {
        Identity::new("set")
    }

    fn expects(&self) -> Option<String> {
        Some("Set".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }
}

impl Schema for SetSchema {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !matches!(dataset.value, Value::Set(_)) {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        }
        let container = dataset.share_value();
        let members = match container.as_ref() {
            Value::Set(members) => members.as_slice(),
            _ => &[],
        };
        dataset.typed = true;
        let mut output: Vec<Value> = Vec::with_capacity(members.len());
        for member in members {
            let mut child = self.value.run(Dataset::new(member.clone()), config);
            let item = || {
                PathItem::new(
                    ContainerType::Set,
                    PathOrigin::Value,
                    Value::Null,
                    member.clone(),
                    Arc::clone(&container),
                )
            };
            if dataset
                .absorb_child(&mut child, item, config.abort_early())
                .is_break()
            {
                break;
            }
            if !output.contains(&child.value) {
                output.push(child.value);
            }
        }
        dataset.value = Value::Set(output);
        dataset
    }
}

pub fn set(value: impl Schema + 'static) -> SetSchema {
    SetSchema {
        value: boxed(value),
        message: None,
    }
}
