//! Schema constructors: leaves, containers and combinators.
//!
//! Every constructor returns a value implementing [`Schema`](crate::core::Schema)
//! or [`AsyncSchema`](crate::core::AsyncSchema). Sync composites take
//! [`BoxedSchema`](crate::core::BoxedSchema) children; the `_async` variants
//! take anything implementing [`IntoSchemaRef`](crate::core::IntoSchemaRef).
//!
//! ## Example
//!
//! ```rust
//! use shape_guard::actions::{min_length, min_value};
//! use shape_guard::core::{boxed, Config, Dataset, Schema};
//! use shape_guard::schemas::{array, number, object, optional, pipe, string};
//! use serde_json::json;
//!
//! let user = object([
//!     ("name", boxed(pipe(string()).step(min_length(1)))),
//!     ("age", boxed(optional(pipe(number()).step(min_value(0.0))))),
//!     ("tags", boxed(array(string()))),
//! ]);
//!
//! let dataset = user.run(Dataset::new(json!({"name": "", "tags": ["a", 1]})), &Config::new());
//! let paths: Vec<_> = dataset
//!     .issues()
//!     .unwrap()
//!     .iter()
//!     .filter_map(|issue| issue.dot_path())
//!     .collect();
//! assert_eq!(paths, vec!["name", "tags.1"]);
//! ```

mod array;
mod cached;
mod config;
mod entries;
mod intersect;
mod lazy;
mod object;
mod pipe;
mod primitive;
mod record;
mod union;
mod wrapper;

pub use array::{
    array, array_async, loose_tuple, strict_tuple, tuple, tuple_async, ArrayAsync, ArraySchema,
    TupleAsync, TupleRest, TupleSchema,
};
pub use cached::{cache_key, cached, cached_with, CachedSchema};
pub use config::{with_config, with_config_async, with_message, ConfigAsync, ConfigSchema};
pub use entries::Entries;
pub use intersect::{intersect, intersect_async, IntersectAsync, IntersectSchema};
pub use lazy::{lazy, lazy_async, LazyAsync, LazySchema};
pub use object::{
    loose_object, loose_object_async, object, object_async, object_with_rest, strict_object,
    strict_object_async, ObjectAsync, ObjectSchema, UnknownKeys,
};
pub use pipe::{pipe, pipe_async, Pipe, PipeAsync};
pub use primitive::{
    any, boolean, custom, custom_async, date, join_expects, literal, never, null, number,
    picklist, string, undefined, unknown, AsyncPredicate, CustomAsyncSchema, CustomSchema,
    LiteralSchema, Predicate, PrimitiveSchema, PrimitiveType,
};
pub use record::{map, record, record_async, set, MapSchema, RecordAsync, RecordSchema, SetSchema};
pub use union::{union, union_async, UnionAsync, UnionSchema};
pub use wrapper::{
    non_optional, non_optional_async, nullable, nullable_async, nullish, nullish_async, optional,
    optional_async, WrapperAsync, WrapperSchema, WrapperType,
};
