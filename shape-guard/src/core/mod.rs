//! Core engine types shared by every schema and action.
//!
//! ## Overview
//!
//! - **[`Value`]**: the dynamic input/output representation
//! - **[`Dataset`]**: a value in flight, its typedness and accumulated issues
//! - **[`Issue`]**: one structured failure, with its path and sub-issues
//! - **[`Schema`] / [`AsyncSchema`]**: the run contract
//! - **[`Config`] / [`Registry`]**: per-call options and localized messages
//! - **[`merge_values`]**: the deep merge behind intersection schemas
//!
//! ## Architecture
//!
//! ```text
//! safe_parse(schema, input, config)
//!     └── schema.run(Dataset, &Config)
//!         ├── pipe       → base schema, then each step in order
//!         ├── object     → each entry's schema, issues get a path step
//!         ├── union      → each candidate on a fresh dataset
//!         └── intersect  → each option, then merge_values
//! ```

mod config;
mod contract;
mod dataset;
mod issue;
mod merge;
mod registry;
mod value;

pub use config::{Config, Message, MessageFn, DEFAULT_MAX_DEPTH};
pub use contract::{
    boxed, AsyncSchema, BoxedAsyncSchema, BoxedSchema, ChildSchema, Describe, IntoSchemaRef, Schema,
    SchemaRef,
};
pub use dataset::Dataset;
pub use issue::{
    add_issue, ContainerType, Issue, IssueDetails, Kind, PathChain, PathItem, PathOrigin,
};
pub use merge::{merge_values, MergeConflict};
pub use registry::{Identity, Registry};
pub use value::{format_number, Object, Value, ValueKind};
