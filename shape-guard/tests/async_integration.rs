//! Async composites: concurrent children, ordered issues, abort policies and
//! mixing sync with async children.

use futures::FutureExt;
use serde_json::json;
use shape_guard::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A check that sleeps `delay_ms` before rejecting every value.
fn slow_reject(delay_ms: u64, message: &'static str) -> SchemaRef {
    pipe_async(string())
        .step(check_async(
            move |_| {
                async move {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    false
                }
                .boxed()
            },
            message,
        ))
        .into_schema_ref()
}

#[tokio::test]
async fn test_issues_follow_declaration_order_not_completion_order() {
    let schema = object_async([
        ("slow", slow_reject(60, "slow failed")),
        ("fast", slow_reject(5, "fast failed")),
    ]);
    let result = safe_parse_async(&schema, json!({"slow": "a", "fast": "b"}), None).await;
    let messages: Vec<_> = result
        .issues
        .iter()
        .flatten()
        .map(|issue| issue.message.as_str())
        .collect();
    assert_eq!(messages, vec!["slow failed", "fast failed"]);
}

#[tokio::test]
async fn test_children_start_concurrently() {
    let schema = array_async(slow_reject(50, "rejected"));
    let started = std::time::Instant::now();
    let result = safe_parse_async(&schema, json!(["a", "b", "c", "d"]), None).await;
    assert_eq!(result.issues.map(|issues| issues.len()), Some(4));
    assert!(started.elapsed() < Duration::from_millis(180));
}

#[tokio::test]
async fn test_abort_early_keeps_only_first_declared_issue() {
    let schema = object_async([
        ("a", slow_reject(30, "a failed")),
        ("b", slow_reject(1, "b failed")),
    ]);
    let config = Config::new().with_abort_early(true);
    let result = safe_parse_async(&schema, json!({"a": "x", "b": "y"}), Some(&config)).await;
    assert!(!result.typed);
    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "a failed");
}

#[tokio::test]
async fn test_sync_children_inside_async_composites() {
    let schema = tuple_async([
        string().into_schema_ref(),
        pipe(number()).step(min_value(10.0)).into_schema_ref(),
    ]);
    let result = safe_parse_async(&schema, json!(["x", 3]), None).await;
    let issue = &result.issues.unwrap()[0];
    assert_eq!(issue.issue_type, "min_value");
    assert_eq!(issue.dot_path().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_async_union_stops_at_first_match() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let schema = union_async([
        number().into_schema_ref(),
        custom_async(move |_| {
            counted.fetch_add(1, Ordering::SeqCst);
            async { true }.boxed()
        })
        .into_schema_ref(),
    ]);
    assert!(safe_parse_async(&schema, 1, None).await.success);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(safe_parse_async(&schema, "x", None).await.success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_async_record_and_intersect() {
    let record = record_async(
        pipe(string()).step(min_length(2)),
        custom_async(|value| async move { value.as_f64().is_some() }.boxed()),
    );
    let result = safe_parse_async(&record, json!({"ok": 1, "x": 2, "bad": "n"}), None).await;
    let paths: Vec<_> = result
        .issues
        .iter()
        .flatten()
        .filter_map(|issue| issue.dot_path())
        .collect();
    assert_eq!(paths, vec!["x", "bad"]);

    let both = intersect_async([
        object_async([("a", string().into_schema_ref())]).into_schema_ref(),
        object([("b", boxed(number()))]).into_schema_ref(),
    ]);
    let result = safe_parse_async(&both, json!({"a": "x", "b": 2}), None).await;
    assert!(result.success);
    assert_eq!(result.output, Value::from(json!({"a": "x", "b": 2})));
}

#[tokio::test]
async fn test_lazy_async_recursion() {
    fn list() -> LazyAsync {
        lazy_async(|_| {
            object_async([
                ("head", number().into_schema_ref()),
                ("tail", nullable_async(list()).into_schema_ref()),
            ])
            .into_schema_ref()
        })
    }
    let input = json!({"head": 1, "tail": {"head": 2, "tail": {"head": "x", "tail": null}}});
    let result = safe_parse_async(&list(), input, None).await;
    assert_eq!(
        result.issues.unwrap()[0].dot_path().as_deref(),
        Some("tail.tail.head")
    );
}
