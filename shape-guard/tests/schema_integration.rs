//! End-to-end behaviour of composed schemas: abort policies, unions,
//! intersections, entries composition and recursive schemas.

use serde_json::json;
use shape_guard::prelude::*;
use shape_guard::schemas::Entries;

fn issue_types(result: &SafeParseResult) -> Vec<&str> {
    result
        .issues
        .iter()
        .flatten()
        .map(|issue| issue.issue_type.as_str())
        .collect()
}

fn signup() -> ObjectSchema {
    object([
        (
            "username",
            boxed(
                pipe(string())
                    .step(min_length(4))
                    .step(regex("^[a-z]+$").unwrap()),
            ),
        ),
        ("password", boxed(pipe(string()).step(min_length(8)))),
        ("age", boxed(pipe(number()).step(integer()))),
    ])
}

mod abort_policies {
    use super::*;

    #[test]
    fn test_default_collects_every_issue() {
        let input = json!({"username": "AB", "password": "short", "age": 1.5});
        let result = safe_parse(&signup(), input, None);
        assert!(result.typed);
        assert_eq!(
            issue_types(&result),
            vec!["min_length", "regex", "min_length", "integer"]
        );
    }

    #[test]
    fn test_abort_early_yields_exactly_one_issue() {
        let input = json!({"username": "AB", "password": "short", "age": 1.5});
        let config = Config::new().with_abort_early(true);
        let result = safe_parse(&signup(), input, Some(&config));
        assert!(!result.typed);
        assert_eq!(issue_types(&result), vec!["min_length"]);
        assert_eq!(result.issues.unwrap()[0].abort_early, Some(true));
    }

    #[test]
    fn test_abort_pipe_early_stops_only_the_tripping_pipe() {
        let input = json!({"username": "AB", "password": "short", "age": 1.5});
        let config = Config::new().with_abort_pipe_early(true);
        let result = safe_parse(&signup(), input, Some(&config));
        assert_eq!(
            issue_types(&result),
            vec!["min_length", "min_length", "integer"]
        );
    }

    #[test]
    fn test_successful_results_carry_no_issues() {
        let input = json!({"username": "alice", "password": "long enough", "age": 30});
        let result = safe_parse(&signup(), input, None);
        assert!(result.success && result.typed);
        assert!(result.issues.is_none());
    }
}

mod union_resolution {
    use super::*;

    #[test]
    fn test_union_equals_matching_candidate() {
        let schema = union(vec![boxed(string()), boxed(number())]);
        let via_union = safe_parse(&schema, 123, None);
        let direct = safe_parse(&number(), 123, None);
        assert_eq!(via_union.success, direct.success);
        assert_eq!(via_union.output, direct.output);
    }

    #[test]
    fn test_total_failure_aggregates_in_candidate_order() {
        let schema = union(vec![boxed(string()), boxed(number()), boxed(boolean())]);
        let result = safe_parse(&schema, json!(null), None);
        let issues = result.issues.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "union");
        assert_eq!(
            issues[0].message,
            "Invalid type: Expected (string | number | boolean) but received null"
        );
        let nested: Vec<_> = issues[0]
            .issues
            .iter()
            .flatten()
            .map(|issue| issue.issue_type.as_str())
            .collect();
        assert_eq!(nested, vec!["string", "number", "boolean"]);
    }

    #[test]
    fn test_union_inside_object_gets_path() {
        let schema = object([(
            "id",
            boxed(union(vec![boxed(string()), boxed(number())])),
        )]);
        let result = safe_parse(&schema, json!({"id": true}), None);
        let errors = flatten(result.issues.as_deref().unwrap());
        assert_eq!(errors.nested.len(), 1);
        assert!(errors.nested.contains_key("id"));
    }
}

mod intersection {
    use super::*;

    #[test]
    fn test_object_outputs_are_deep_merged() {
        let schema = intersect(vec![
            boxed(object([("a", boxed(string()))])),
            boxed(object([("b", boxed(number()))])),
        ]);
        let result = safe_parse(&schema, json!({"a": "x", "b": 1, "c": true}), None);
        assert!(result.success);
        assert_eq!(result.output, Value::from(json!({"a": "x", "b": 1})));
    }

    #[test]
    fn test_merge_conflicts_fail_with_single_issue() {
        for (left, right) in [
            (json!(1), json!(2)),
            (json!("foo"), json!("bar")),
            (json!([1]), json!([1, 2])),
            (json!({"key": 1}), json!({"key": "1"})),
        ] {
            let schema = intersect(vec![
                boxed(pipe(any()).step(transform(move |_| Value::from(left.clone())))),
                boxed(pipe(any()).step(transform(move |_| Value::from(right.clone())))),
            ]);
            let result = safe_parse(&schema, json!(null), None);
            assert!(!result.typed);
            assert_eq!(result.issues.map(|i| i.len()), Some(1));
        }
    }

    #[test]
    fn test_option_issues_are_kept() {
        let schema = intersect(vec![
            boxed(object([("a", boxed(string()))])),
            boxed(object([("b", boxed(number()))])),
        ]);
        let result = safe_parse(&schema, json!({"a": 1, "b": "x"}), None);
        assert_eq!(issue_types(&result), vec!["string", "number"]);
    }
}

mod entries_composition {
    use super::*;

    fn base() -> Entries {
        [("id", boxed(number())), ("name", boxed(string()))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_merge_is_right_biased_and_order_preserving() {
        let extra: Entries = [("name", boxed(number())), ("email", boxed(string()))]
            .into_iter()
            .collect();
        let merged = base().merge(&extra);
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["id", "name", "email"]);
        assert_eq!(merged.get("name").map(|s| s.type_tag()), Some("number"));
    }

    #[test]
    fn test_pick_omit_and_partial_objects() {
        let schema = object(base());
        let picked = schema.pick(&["name"]);
        assert!(safe_parse(&picked, json!({"name": "a"}), None).success);

        let omitted = schema.omit(&["name"]);
        assert!(safe_parse(&omitted, json!({"id": 1}), None).success);

        let partial = schema.partial();
        assert!(safe_parse(&partial, json!({}), None).success);
        let required = partial.required();
        let result = safe_parse(&required, json!({}), None);
        assert_eq!(issue_types(&result), vec!["non_optional", "non_optional"]);
    }

    #[test]
    fn test_keyof_lists_entry_keys() {
        let keys = object(base()).keyof();
        assert!(is(&keys, "id"));
        assert!(!is(&keys, "email"));
    }
}

mod recursion {
    use super::*;

    fn tree() -> LazySchema<BoxedSchema> {
        lazy(|_| {
            boxed(object([
                ("value", boxed(number())),
                ("children", boxed(optional(array(tree())))),
            ]))
        })
    }

    #[test]
    fn test_recursive_schema_reports_deep_paths() {
        let input = json!({
            "value": 1,
            "children": [{"value": 2, "children": [{"value": "x"}]}]
        });
        let result = safe_parse(&tree(), input, None);
        let issue = &result.issues.unwrap()[0];
        assert_eq!(
            issue.dot_path().as_deref(),
            Some("children.0.children.0.value")
        );
    }

    #[test]
    fn test_depth_limit_is_an_issue_not_a_crash() {
        let mut input = json!({"value": 0});
        for depth in 1..20 {
            input = json!({"value": depth, "children": [input]});
        }
        let config = Config::new().with_max_depth(5);
        let result = safe_parse(&tree(), input, Some(&config));
        assert!(!result.typed);
        assert!(issue_types(&result).contains(&"lazy"));
    }
}
