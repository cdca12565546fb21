//! Schemas that install local config overrides for everything they wrap.

use crate::core::{
    boxed, AsyncSchema, BoxedSchema, ChildSchema, Config, Dataset, Describe, Identity,
    IntoSchemaRef, Kind, Message, Schema, SchemaRef, Value,
};
use crate::impl_into_schema_ref;
use async_trait::async_trait;

/// Runs the wrapped schema with `overrides` merged over the caller's config.
///
/// Options set in `overrides` win; options left unset fall through to the
/// caller's config.
///
/// # Examples
///
/// ```rust
/// use shape_guard::core::{Config, Dataset, Schema};
/// use shape_guard::schemas::{string, with_message};
///
/// let schema = with_message(string(), "Please enter text");
/// let dataset = schema.run(Dataset::new(1), &Config::new());
/// assert_eq!(dataset.issues().unwrap()[0].message, "Please enter text");
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSchema<S = BoxedSchema> {
    wrapped: S,
    overrides: Config,
}

pub type ConfigAsync = ConfigSchema<SchemaRef>;

impl<S> ConfigSchema<S> {
    pub fn overrides(&self) -> &Config {
        &self.overrides
    }

    pub fn wrapped(&self) -> &S {
        &self.wrapped
    }
}

impl<S: ChildSchema> Describe for ConfigSchema<S> {
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

    fn is_async(&self) -> bool {
        S::ASYNC
    }
}

impl Schema for ConfigSchema<BoxedSchema> {
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        self.wrapped.run(dataset, &self.overrides.merged_over(config))
    }
}

#[async_trait]
impl AsyncSchema for ConfigSchema<SchemaRef> {
    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset {
        let merged = self.overrides.merged_over(config);
        self.wrapped.run(dataset, &merged).await
    }
}

impl_into_schema_ref!(ConfigSchema<SchemaRef>);

pub fn with_config(schema: impl Schema + 'static, overrides: Config) -> ConfigSchema<BoxedSchema> {
    ConfigSchema {
        wrapped: boxed(schema),
        overrides,
    }
}

/// Shorthand for [`with_config`] with only a message set.
pub fn with_message(
    schema: impl Schema + 'static,
    message: impl Into<Message>,
) -> ConfigSchema<BoxedSchema> {
    with_config(schema, Config::new().with_message(message))
}

pub fn with_config_async(schema: impl IntoSchemaRef, overrides: Config) -> ConfigAsync {
    ConfigSchema {
        wrapped: schema.into_schema_ref(),
        overrides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::min_length;
    use crate::core::{boxed, Issue};
    use crate::schemas::{number, object, pipe, string};
    use serde_json::json;

    #[test]
    fn test_message_applies_to_every_nested_issue() {
        let schema = with_message(
            object([("a", boxed(string())), ("b", boxed(number()))]),
            Message::dynamic(|issue: &Issue| format!("bad {}", issue.issue_type)),
        );
        let dataset = schema.run(Dataset::new(json!({"a": 1, "b": "x"})), &Config::new());
        let messages: Vec<_> = dataset
            .issues()
            .unwrap()
            .iter()
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(messages, vec!["bad string", "bad number"]);
    }

    #[test]
    fn test_local_overrides_win_and_unset_options_fall_through() {
        let schema = with_config(
            pipe(string()).step(min_length(3)),
            Config::new().with_lang("de"),
        );
        let caller = Config::new().with_lang("en").with_abort_pipe_early(true);
        let dataset = schema.run(Dataset::new("ab"), &caller);
        let issue = &dataset.issues().unwrap()[0];
        assert_eq!(issue.lang.as_deref(), Some("de"));
        assert_eq!(issue.abort_pipe_early, Some(true));
    }

    #[test]
    fn test_own_message_beats_wrapper_message() {
        let schema = with_message(string().with_message("own"), "wrapper");
        let dataset = schema.run(Dataset::new(1), &Config::new());
        assert_eq!(dataset.issues().unwrap()[0].message, "own");
    }

    #[tokio::test]
    async fn test_with_config_async() {
        let schema = with_config_async(string(), Config::new().with_message("nope"));
        assert!(schema.is_async());
        let dataset = schema.run_async(Dataset::new(1), &Config::new()).await;
        assert_eq!(dataset.issues().unwrap()[0].message, "nope");
    }
}
