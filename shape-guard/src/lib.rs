//! # shape-guard - Composable Structural Validation for Rust
//!
//! shape-guard validates dynamically shaped data (JSON documents, config
//! trees, request bodies) against schemas built from small composable
//! pieces, and reports every problem it finds as structured, path-addressed
//! issues instead of stopping at the first one.
//!
//! ## Overview
//!
//! A schema is anything implementing the run contract: it takes a
//! [`Dataset`](core::Dataset) (the value in flight plus the issues collected
//! so far) and a [`Config`](core::Config), and returns a dataset. Leaf
//! schemas check a single kind, composites such as objects, arrays, unions
//! and intersections run their children and fold the results, and pipes
//! chain a schema with validation and transformation steps.
//!
//! ## Quick Start
//!
//! ```rust
//! use shape_guard::prelude::*;
//! use serde_json::json;
//!
//! let user = object([
//!     ("email", boxed(pipe(string()).step(trim()).step(regex(r"^[^@]+@[^@]+$")?))),
//!     ("age", boxed(optional(pipe(number()).step(integer()).step(min_value(0.0))))),
//!     ("roles", boxed(array(picklist(["admin", "user"])))),
//! ]);
//!
//! let result = safe_parse(&user, json!({"email": " ada@example.com ", "roles": ["user"]}), None);
//! assert!(result.success);
//! assert_eq!(result.output.to_json()["email"], "ada@example.com");
//!
//! let result = safe_parse(&user, json!({"email": "nope", "age": -1.5, "roles": ["root"]}), None);
//! let errors = flatten(result.issues.as_deref().unwrap_or_default());
//! assert_eq!(
//!     errors.nested.keys().collect::<Vec<_>>(),
//!     vec!["age", "email", "roles.0"]
//! );
//! # Ok::<(), shape_guard::error::ShapeError>(())
//! ```
//!
//! ## Key Features
//!
//! ### Abort policies
//!
//! By default every reachable issue is collected in one pass.
//! `abort_early` stops the whole run at the first issue; `abort_pipe_early`
//! stops only the pipe that raised it, while its siblings keep validating.
//!
//! ### Localized messages
//!
//! Messages resolve through a cascade: the schema's own message, a local
//! [`with_message`](schemas::with_message) override, then messages
//! registered in a [`Registry`](core::Registry) per identity and locale, and
//! finally a built-in template.
//!
//! ```rust
//! use shape_guard::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::new());
//! registry.set_specific_message(Identity::new("string"), "Bitte Text eingeben", Some("de"));
//!
//! let config = Config::new().with_lang("de").with_registry(registry);
//! let result = safe_parse(&string(), 42, Some(&config));
//! assert_eq!(result.issues.unwrap()[0].message, "Bitte Text eingeben");
//! ```
//!
//! ### Async validation
//!
//! Every composite has an `_async` twin accepting both sync and async
//! children; independent children start concurrently and their issues are
//! reported in declaration order.
//!
//! ## Architecture
//!
//! - **`core`**: values, datasets, issues, the run contract, configs and registries
//! - **`schemas`**: leaf and composite schema constructors
//! - **`actions`**: validation and transformation pipe steps
//! - **`parse`**: the `safe_parse`/`parse` boundary and issue flattening
//! - **`cache`**: the LRU/TTL cache behind `cached` schemas
//! - **`logging`**: verbosity knobs and subscriber setup

pub mod actions;
pub mod cache;
pub mod core;
pub mod error;
pub mod logging;
pub mod parse;
pub mod prelude;
pub mod schemas;
