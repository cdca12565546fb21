//! Memoization of whole validation results.

use crate::cache::{Cache, CacheOptions};
use crate::core::{
    boxed, BoxedSchema, Config, Dataset, Describe, Identity, Kind, Message, Schema, Value,
};
use crate::error::Result;
use crate::log_cache;
use crate::logging::LogConfig;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// A JSON rendering of `value` that keeps every kind distinct, so that
/// e.g. `undefined` and `null`, or a date and its string form, get
/// different keys.
fn tagged(value: &Value) -> serde_json::Value {
    match value {
        Value::Undefined => json!(["u"]),
        Value::Null => json!(["n"]),
        Value::Bool(b) => json!(["b", b]),
        Value::Number(n) => json!(["d", n.to_bits().to_string()]),
        Value::String(s) => json!(["s", s]),
        Value::Date(d) => json!(["t", d.timestamp_nanos_opt().unwrap_or_else(|| d.timestamp())]),
        Value::Array(items) => json!(["a", items.iter().map(tagged).collect::<Vec<_>>()]),
        Value::Set(items) => json!(["S", items.iter().map(tagged).collect::<Vec<_>>()]),
        Value::Map(pairs) => json!([
            "M",
            pairs
                .iter()
                .map(|(k, v)| json!([tagged(k), tagged(v)]))
                .collect::<Vec<_>>()
        ]),
        Value::Object(object) => json!([
            "o",
            object
                .iter()
                .map(|(k, v)| json!([k, tagged(v)]))
                .collect::<Vec<_>>()
        ]),
    }
}

/// The cache key for validating `value` under `config`.
///
/// Covers the input and every config option that can change the result,
/// including the message and the registry revision the messages are
/// looked up in. Returns `None` when the result cannot be keyed, which is
/// the case for a config carrying a dynamic message.
pub fn cache_key(value: &Value, config: &Config) -> Option<String> {
    let message = match &config.message {
        None => serde_json::Value::Null,
        Some(Message::Text(text)) => json!(text),
        Some(Message::Dynamic(_)) => return None,
    };
    let registry = config.registry();
    let policy = json!([
        config.lang(),
        message,
        config.abort_early(),
        config.abort_pipe_early(),
        config.skip_pipe(),
        config.max_depth(),
        config.depth(),
        registry.id(),
        registry.revision(),
    ]);
    let encoded = serde_json::to_string(&json!([tagged(value), policy]))
        .unwrap_or_else(|_| String::from("[]"));

    let mut hasher = Sha256::new();
    hasher.update(encoded.as_bytes());
    Some(hex::encode(hasher.finalize()))
}

/// Wraps a schema and reuses its output dataset for inputs seen before.
///
/// Only fresh datasets are looked up; a dataset that already carries issues,
/// or a config without a [`cache_key`], is always validated directly.
/// Schemas with per-issue closures that depend on anything but the input
/// should not be cached.
#[derive(Debug, Clone)]
pub struct CachedSchema {
    wrapped: BoxedSchema,
    cache: Arc<Cache<Dataset>>,
    log: LogConfig,
}

impl CachedSchema {
    /// Controls whether hits and misses are logged.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    pub fn cache(&self) -> &Arc<Cache<Dataset>> {
        &self.cache
    }
}

impl Describe for CachedSchema {
    fn kind(&self) -> Kind {
        self.wrapped.kind()
    }

    fn type_tag(&self) -> &str {
        self.wrapped.type_tag()
    }

    fn identity(&self) -> Identity {
        self.wrapped.identity()
    }

    fn expects(&self) -> Option<String> {
        self.wrapped.expects()
    }

    fn requirement(&self) -> Option<Value> {
        self.wrapped.requirement()
    }

    fn message(&self) -> Option<&Message> {
        self.wrapped.message()
    }
}

impl Schema for CachedSchema {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        if dataset.has_issues() {
            return self.wrapped.run(dataset, config);
        }
        let Some(key) = cache_key(&dataset.value, config) else {
            return self.wrapped.run(dataset, config);
        };
        if let Some(hit) = self.cache.get(&key) {
            log_cache!(self.log, cache.key = %key, "Validation cache hit");
            return hit;
        }
        log_cache!(self.log, cache.key = %key, "Validation cache miss");
        let output = self.wrapped.run(dataset, config);
        self.cache.set(key, output.clone());
        output
    }
}

/// Caches `schema`'s results in a new cache built from `options`.
pub fn cached(schema: impl Schema + 'static, options: CacheOptions) -> Result<CachedSchema> {
    Ok(CachedSchema {
        wrapped: boxed(schema),
        cache: Arc::new(Cache::new(options)?),
        log: LogConfig::default(),
    })
}

/// Caches `schema`'s results in an existing, possibly shared, cache.
pub fn cached_with(schema: impl Schema + 'static, cache: Arc<Cache<Dataset>>) -> CachedSchema {
    CachedSchema {
        wrapped: boxed(schema),
        cache,
        log: LogConfig::default(),
    }
}
