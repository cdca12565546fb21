//! The run contract shared by every schema and action.
//!
//! Leaf schemas, composite schemas, validation steps and transformation steps
//! all implement the same operation: take a [`Dataset`] and a [`Config`],
//! return a dataset. Data problems are reported as issues on the returned
//! dataset, never as panics or `Err` values.
//!
//! Synchronous schemas implement [`Schema`]; schemas that must await
//! something implement [`AsyncSchema`]. Sync composites only accept sync
//! children, async composites accept either through [`SchemaRef`], so a sync
//! parent can never end up holding an async child.

use super::config::{Config, Message};
use super::dataset::Dataset;
use super::issue::Kind;
use super::registry::Identity;
use super::value::Value;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// The descriptive fields every schema and action carries.
pub trait Describe: Debug + Send + Sync {
    /// Whether this is a schema, a validation or a transformation.
    fn kind(&self) -> Kind;

    /// The type tag written into issues, e.g. `"string"` or `"min_length"`.
    fn type_tag(&self) -> &str;

    /// The constructor this instance came from; keys localized messages.
    fn identity(&self) -> Identity;

    /// Human description of what is expected, e.g. `"string"` or `">=3"`.
    fn expects(&self) -> Option<String> {
        None
    }

    /// The comparator or pattern checked against, if any.
    fn requirement(&self) -> Option<Value> {
        None
    }

    /// A message attached to this instance at construction time.
    fn message(&self) -> Option<&Message> {
        None
    }

    /// Whether the run contract must be awaited.
    fn is_async(&self) -> bool {
        false
    }
}

/// A synchronous schema or action.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{add_issue, Config, Dataset, Describe, Identity, IssueDetails, Kind, Schema};
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl Describe for Even {
///     fn kind(&self) -> Kind { Kind::Schema }
///     fn type_tag(&self) -> &str { "even" }
///     fn identity(&self) -> Identity { Identity::new("even") }
///     fn expects(&self) -> Option<String> { Some("even number".into()) }
/// }
///
/// impl Schema for Even {
///     fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
///         match dataset.value.as_f64() {
///             Some(n) if n % 2.0 == 0.0 => dataset.typed = true,
///             _ => add_issue(self, "type", &mut dataset, config, IssueDetails::new()),
///         }
///         dataset
///     }
/// }
///
/// let result = Even.run(Dataset::new(3), &Config::new());
/// assert!(!result.typed);
/// assert_eq!(
///     result.issues().unwrap()[0].message,
///     "Invalid type: Expected even number but received 3"
/// );
/// ```
pub trait Schema: Describe {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset;
}

/// An asynchronous schema or action.
#[async_trait]
pub trait AsyncSchema: Describe {
    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset;
}

/// A shared synchronous schema.
pub type BoxedSchema = Arc<dyn Schema>;

/// A shared asynchronous schema.
pub type BoxedAsyncSchema = Arc<dyn AsyncSchema>;

impl<S: Describe + ?Sized> Describe for Arc<S> {
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    fn type_tag(&self) -> &str {
        (**self).type_tag()
    }

    fn identity(&self) -> Identity {
        (**self).identity()
    }

    fn expects(&self) -> Option<String> {
        (**self).expects()
    }

    fn requirement(&self) -> Option<Value> {
        (**self).requirement()
    }

    fn message(&self) -> Option<&Message> {
        (**self).message()
    }

    fn is_async(&self) -> bool {
        (**self).is_async()
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        (**self).run(dataset, config)
    }
}

/// A child of an async composite: either kind of schema.
#[derive(Debug, Clone)]
pub enum SchemaRef {
    Sync(BoxedSchema),
    Async(BoxedAsyncSchema),
}

impl SchemaRef {
    /// Runs the child, awaiting it only if it is asynchronous.
    pub async fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        match self {
            SchemaRef::Sync(schema) => schema.run(dataset, config),
            SchemaRef::Async(schema) => schema.run_async(dataset, config).await,
        }
    }
}

impl Describe for SchemaRef {
    fn kind(&self) -> Kind {
        match self {
            SchemaRef::Sync(s) => s.kind(),
            SchemaRef::Async(s) => s.kind(),
        }
    }

    fn type_tag(&self) -> &str {
        match self {
            SchemaRef::Sync(s) => s.type_tag(),
            SchemaRef::Async(s) => s.type_tag(),
        }
    }

    fn identity(&self) -> Identity {
        match self {
            SchemaRef::Sync(s) => s.identity(),
            SchemaRef::Async(s) => s.identity(),
        }
    }

    fn expects(&self) -> Option<String> {
        match self {
            SchemaRef::Sync(s) => s.expects(),
            SchemaRef::Async(s) => s.expects(),
        }
    }

    fn requirement(&self) -> Option<Value> {
        match self {
            SchemaRef::Sync(s) => s.requirement(),
            SchemaRef::Async(s) => s.requirement(),
        }
    }

    fn message(&self) -> Option<&Message> {
        match self {
            SchemaRef::Sync(s) => s.message(),
            SchemaRef::Async(s) => s.message(),
        }
    }

    fn is_async(&self) -> bool {
        matches!(self, SchemaRef::Async(_))
    }
}

impl From<BoxedAsyncSchema> for SchemaRef {
    fn from(schema: BoxedAsyncSchema) -> Self {
        SchemaRef::Async(schema)
    }
}

/// A child slot of a composite: [`BoxedSchema`] in sync composites,
/// [`SchemaRef`] in async ones.
pub trait ChildSchema: Describe + Clone + 'static {
    /// Whether composites holding this child type must be awaited.
    const ASYNC: bool;
}

impl ChildSchema for BoxedSchema {
    const ASYNC: bool = false;
}

impl ChildSchema for SchemaRef {
    const ASYNC: bool = true;
}

/// Conversion into a child of an async composite.
///
/// Implemented for every sync schema and for the crate's async schemas.
pub trait IntoSchemaRef {
    fn into_schema_ref(self) -> SchemaRef;
}

impl<S: Schema + 'static> IntoSchemaRef for S {
    fn into_schema_ref(self) -> SchemaRef {
        SchemaRef::Sync(Arc::new(self))
    }
}

impl IntoSchemaRef for SchemaRef {
    fn into_schema_ref(self) -> SchemaRef {
        self
    }
}

/// Implements [`IntoSchemaRef`] for async schema types.
#[macro_export]
macro_rules! impl_into_schema_ref {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::core::IntoSchemaRef for $ty {
                fn into_schema_ref(self) -> $crate::core::SchemaRef {
                    $crate::core::SchemaRef::Async(::std::sync::Arc::new(self))
                }
            }
        )*
    };
}

/// Boxes a sync schema for storage in a composite.
pub fn boxed(schema: impl Schema + 'static) -> BoxedSchema {
    Arc::new(schema)
}
