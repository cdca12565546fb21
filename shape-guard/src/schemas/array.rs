//! Array and tuple schemas.

use crate::core::{
    add_issue, boxed, AsyncSchema, BoxedSchema, ChildSchema, Config, ContainerType, Dataset,
    Describe, Identity, IntoSchemaRef, IssueDetails, Kind, Message, PathChain, PathItem,
    PathOrigin, Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;
use futures::future::join_all;
use std::ops::ControlFlow;
use std::sync::Arc;

fn elements(container: &Value) -> &[Value] {
    container.as_array().map_or(&[], Vec::as_slice)
}

fn item_path(container_type: ContainerType, container: &Arc<Value>, index: usize) -> PathItem {
    PathItem::new(
        container_type,
        PathOrigin::Value,
        Value::from(index),
        elements(container).get(index).cloned().unwrap_or_default(),
        Arc::clone(container),
    )
}

/// Folds the result for element `index` into `dataset` and `output`.
fn absorb_item(
    dataset: &mut Dataset,
    output: &mut Vec<Value>,
    container_type: ContainerType,
    container: &Arc<Value>,
    index: usize,
    mut child: Dataset,
    config: &Config,
) -> ControlFlow<()> {
    let item = || item_path(container_type, container, index);
    dataset.absorb_child(&mut child, item, config.abort_early())?;
    output.push(child.value);
    ControlFlow::Continue(())
}

/// Validates every element of an array against one item schema.
#[derive(Debug, Clone)]
pub struct ArraySchema<S = BoxedSchema> {
    item: S,
    message: Option<Message>,
}

pub type ArrayAsync = ArraySchema<SchemaRef>;

impl<S> ArraySchema<S> {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn item(&self) -> &S {
        &self.item
    }
}

impl<S: ChildSchema> Describe for ArraySchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        "array"
    }

    fn identity(&self) -> Identity {
        Identity::new("array")
    }

    fn expects(&self) -> Option<String> {
        Some("Array".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for ArraySchema<BoxedSchema> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.value.as_array().is_none() {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        }
        let container = dataset.share_value();
        let input = elements(&container);
        dataset.typed = true;
        let mut output = Vec::with_capacity(input.len());
        for (index, value) in input.iter().enumerate() {
            let child = self.item.run(Dataset::new(value.clone()), config);
            let step = absorb_item(
                &mut dataset,
                &mut output,
                ContainerType::Array,
                &container,
                index,
                child,
                config,
            );
            if step.is_break() {
                break;
            }
        }
        dataset.value = Value::Array(output);
        dataset
    }
}

#[async_trait]
impl AsyncSchema for ArraySchema<SchemaRef> {
    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.value.as_array().is_none() {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        }
        let container = dataset.share_value();
        let input = elements(&container);
        dataset.typed = true;
        let children = join_all(
            input
                .iter()
                .map(|value| self.item.run(Dataset::new(value.clone()), config)),
        )
        .await;
        let mut output = Vec::with_capacity(input.len());
        for (index, child) in children.into_iter().enumerate() {
            let step = absorb_item(
                &mut dataset,
                &mut output,
                ContainerType::Array,
                &container,
                index,
                child,
                config,
            );
            if step.is_break() {
                break;
            }
        }
        dataset.value = Value::Array(output);
        dataset
    }
}

impl_into_schema_ref!(ArraySchema<SchemaRef>);

pub fn array(item: impl Schema + 'static) -> ArraySchema<BoxedSchema> {
    ArraySchema {
        item: boxed(item),
        message: None,
    }
}

pub fn array_async(item: impl IntoSchemaRef) -> ArrayAsync {
    ArraySchema {
        item: item.into_schema_ref(),
        message: None,
    }
}

/// What a tuple does with elements past its last item schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleRest {
    /// Dropped from the output
    Strip,
    /// Copied to the output unchanged
    Passthrough,
    /// Reported as an issue on the first extra element
    Reject,
}

/// Validates an array position by position.
#[derive(Debug, Clone)]
pub struct TupleSchema<S = BoxedSchema> {
    items: Vec<S>,
    rest: TupleRest,
    message: Option<Message>,
}

pub type TupleAsync = TupleSchema<SchemaRef>;

impl<S: ChildSchema> TupleSchema<S> {
    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn items(&self) -> &[S] {
        &self.items
    }

    /// Applies the rest policy once every item schema has run.
    fn finish(
        &self,
        mut dataset: Dataset,
        mut output: Vec<Value>,
        container: &Arc<Value>,
        config: &Config,
    ) -> Dataset {
        let extra = elements(container).get(self.items.len()..).unwrap_or_default();
        match self.rest {
            TupleRest::Strip => {}
            TupleRest::Passthrough => output.extend_from_slice(extra),
            TupleRest::Reject => {
                if let Some(first) = extra.first() {
                    let item = item_path(ContainerType::Tuple, container, self.items.len());
                    add_issue(
                        self,
                        "type",
                        &mut dataset,
                        config,
                        IssueDetails::new()
                            .input(first.clone())
                            .expected("never")
                            .path(PathChain::single(item)),
                    );
                }
            }
        }
        dataset.value = Value::Array(output);
        dataset
    }

    fn name(&self) -> &'static str {
        match self.rest {
            TupleRest::Strip => "tuple",
            TupleRest::Passthrough => "loose_tuple",
            TupleRest::Reject => "strict_tuple",
        }
    }
}

impl<S: ChildSchema> Describe for TupleSchema<S> {
    fn kind(&self) -> Kind {
        Kind::Schema
    }

    fn type_tag(&self) -> &str {
        self.name()
    }

    fn identity(&self) -> Identity {
        Identity::new(self.name())
    }

    fn expects(&self) -> Option<String> {
        Some("Array".to_string())
    }

    fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for TupleSchema<BoxedSchema> {
    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.value.as_array().is_none() {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        }
        let container = dataset.share_value();
        let input = elements(&container);
        dataset.typed = true;
        let mut output = Vec::with_capacity(self.items.len());
        for (index, schema) in self.items.iter().enumerate() {
            let value = input.get(index).cloned().unwrap_or_default();
            let child = schema.run(Dataset::new(value), config);
            let step = absorb_item(
                &mut dataset,
                &mut output,
                ContainerType::Tuple,
                &container,
                index,
                child,
                config,
            );
            if step.is_break() {
                dataset.value = Value::Array(output);
                return dataset;
            }
        }
        self.finish(dataset, output, &container, config)
    }
}

#[async_trait]
impl AsyncSchema for TupleSchema<SchemaRef> {
    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.value.as_array().is_none() {
            add_issue(self, "type", &mut dataset, config, IssueDetails::new());
            return dataset;
        }
        let container = dataset.share_value();
        let input = elements(&container);
        dataset.typed = true;
        let children = join_all(self.items.iter().enumerate().map(|(index, schema)| {
            let value = input.get(index).cloned().unwrap_or_default();
            schema.run(Dataset::new(value), config)
        }))
        .await;
        let mut output = Vec::with_capacity(self.items.len());
        for (index, child) in children.into_iter().enumerate() {
            let step = absorb_item(
                &mut dataset,
                &mut output,
                ContainerType::Tuple,
                &container,
                index,
                child,
                config,
            );
            if step.is_break() {
                dataset.value = Value::Array(output);
                return dataset;
            }
        }
        self.finish(dataset, output, &container, config)
    }
}

impl_into_schema_ref!(TupleSchema<SchemaRef>);

fn tuple_of(items: Vec<BoxedSchema>, rest: TupleRest) -> TupleSchema<BoxedSchema> {
    TupleSchema {
        items,
        rest,
        message: None,
    }
}

/// A tuple that drops elements past its items.
pub fn tuple(items: Vec<BoxedSchema>) -> TupleSchema<BoxedSchema> {
    tuple_of(items, TupleRest::Strip)
}

/// A tuple that keeps elements past its items unvalidated.
pub fn loose_tuple(items: Vec<BoxedSchema>) -> TupleSchema<BoxedSchema> {
    tuple_of(items, TupleRest::Passthrough)
}

/// A tuple that rejects elements past its items.
pub fn strict_tuple(items: Vec<BoxedSchema>) -> TupleSchema<BoxedSchema> {
    tuple_of(items, TupleRest::Reject)
}

pub fn tuple_async<I>(items: I) -> TupleAsync
where
    I: IntoIterator,
    I::Item: IntoSchemaRef,
{
    TupleSchema {
        items: items.into_iter().map(IntoSchemaRef::into_schema_ref).collect(),
        rest: TupleRest::Strip,
        message: None,
    }
}
