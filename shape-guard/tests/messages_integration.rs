//! Message resolution through the config cascade and registries.

use serde_json::json;
use shape_guard::prelude::*;
use std::sync::Arc;

fn first_message(result: SafeParseResult) -> String {
    result
        .issues
        .and_then(|issues| issues.into_iter().next())
        .map(|issue| issue.message)
        .unwrap_or_default()
}

fn config_with(registry: &Arc<Registry>) -> Config {
    Config::new().with_registry(Arc::clone(registry))
}

#[test]
fn test_cascade_order() {
    let registry = Arc::new(Registry::new());
    let config = config_with(&registry);

    assert_eq!(
        first_message(safe_parse(&string(), 1, Some(&config))),
        "Invalid type: Expected string but received 1"
    );

    registry.set_global_message("global", None);
    assert_eq!(first_message(safe_parse(&string(), 1, Some(&config))), "global");

    registry.set_schema_message("schema", None);
    assert_eq!(first_message(safe_parse(&string(), 1, Some(&config))), "schema");

    registry.set_specific_message(Identity::new("string"), "specific", None);
    assert_eq!(first_message(safe_parse(&string(), 1, Some(&config))), "specific");

    let local = config.clone().with_message("local");
    assert_eq!(first_message(safe_parse(&string(), 1, Some(&local))), "local");

    let own = string().with_message("own");
    assert_eq!(first_message(safe_parse(&own, 1, Some(&local))), "own");
}

#[test]
fn test_schema_message_skips_validation_issues() {
    let registry = Arc::new(Registry::new());
    registry.set_schema_message("wrong shape", None);
    registry.set_global_message("fallback", None);
    let config = config_with(&registry);

    let schema = pipe(string()).step(min_length(3));
    assert_eq!(first_message(safe_parse(&schema, 1, Some(&config))), "wrong shape");
    assert_eq!(first_message(safe_parse(&schema, "a", Some(&config))), "fallback");
}

#[test]
fn test_locales_are_distinct_keys() {
    let registry = Arc::new(Registry::new());
    registry.set_specific_message(Identity::new("number"), "Zahl erwartet", Some("de"));
    registry.set_specific_message(Identity::new("number"), "number expected", None);

    let de = config_with(&registry).with_lang("de");
    let fr = config_with(&registry).with_lang("fr");
    let none = config_with(&registry);

    assert_eq!(first_message(safe_parse(&number(), "x", Some(&de))), "Zahl erwartet");
    assert_eq!(
        first_message(safe_parse(&number(), "x", Some(&fr))),
        "Invalid type: Expected number but received \"x\""
    );
    assert_eq!(first_message(safe_parse(&number(), "x", Some(&none))), "number expected");
}

#[test]
fn test_global_config_supplies_lang_and_policies() {
    let registry = Arc::new(Registry::new());
    registry.set_global_config(Config::new().with_lang("de").with_abort_early(true));
    registry.set_specific_message(Identity::new("string"), "Text erwartet", Some("de"));

    let schema = object([("a", boxed(string())), ("b", boxed(string()))]);
    let result = safe_parse(&schema, json!({"a": 1, "b": 2}), Some(&config_with(&registry)));
    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].lang.as_deref(), Some("de"));
    assert_eq!(issues[0].message, "Text erwartet");

    let local = config_with(&registry).with_lang("en");
    let result = safe_parse(&schema, json!({"a": 1, "b": 2}), Some(&local));
    assert_eq!(result.issues.unwrap()[0].lang.as_deref(), Some("en"));
}

#[test]
fn test_dynamic_messages_see_the_issue() {
    let schema = with_message(
        object([("age", boxed(pipe(number()).step(min_value(18.0))))]),
        Message::dynamic(|issue| {
            format!(
                "{} needs {}",
                issue.dot_path().unwrap_or_default(),
                issue.expected.clone().unwrap_or_default()
            )
        }),
    );
    let result = safe_parse(&schema, json!({"age": 12}), None);
    // the message is rendered before the object adds its path step
    assert_eq!(first_message(result), " needs >=18");
}

#[test]
fn test_localized_union_failure() {
    let registry = Arc::new(Registry::new());
    registry.set_specific_message(Identity::new("union"), "Weder Text noch Zahl", Some("de"));
    let config = config_with(&registry).with_lang("de");
    let schema = union(vec![boxed(string()), boxed(number())]);
    let result = safe_parse(&schema, true, Some(&config));
    let issue = &result.issues.unwrap()[0];
    assert_eq!(issue.message, "Weder Text noch Zahl");
    assert_eq!(issue.issues.as_ref().map(Vec::len), Some(2));
}
