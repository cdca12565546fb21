//! Prelude for commonly used types, traits and constructors in shape-guard.

pub use crate::actions::{
    check, check_async, integer, length, max_length, max_value, min_length, min_value, non_empty,
    regex, to_lower_case, to_upper_case, transform, transform_async, trim, try_transform,
};
pub use crate::cache::{Cache, CacheOptions};
pub use crate::core::{
    boxed, AsyncSchema, BoxedSchema, Config, Dataset, Describe, Identity, IntoSchemaRef, Issue,
    Kind, Message, Registry, Schema, SchemaRef, Value,
};
pub use crate::error::{Result, ShapeError, ValiError};
pub use crate::logging::LogConfig;
pub use crate::parse::{
    flatten, is, parse, parse_as, parse_async, safe_parse, safe_parse_async, FlatErrors,
    SafeParseResult,
};
pub use crate::schemas::*;
