//! Basic validation example demonstrating shape-guard's core functionality.
//!
//! This example shows how to:
//! - Compose an object schema from leaves, pipes and wrappers
//! - Collect every issue in one pass, or stop early
//! - Group issues by path and deserialize a validated output
//!
//! Run with:
//! ```bash
//! cargo run --example basic_validation
//! ```

use serde::Deserialize;
use serde_json::json;
use shape_guard::prelude::*;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Customer {
    id: u64,
    name: String,
    email: String,
    tags: Vec<String>,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let customer = object([
        ("id", boxed(pipe(number()).step(integer()).step(min_value(1.0)))),
        ("name", boxed(pipe(string()).step(trim()).step(non_empty()))),
        (
            "email",
            boxed(
                pipe(string())
                    .step(trim())
                    .step(to_lower_case())
                    .step(regex(r"^[^@\s]+@[^@\s]+\.[a-z]+$")?),
            ),
        ),
        (
            "tags",
            boxed(optional(array(pipe(string()).step(max_length(12)))).with_default(json!([]))),
        ),
    ]);

    println!("Running basic validation example...\n");

    let valid = json!({"id": 1, "name": " Alice Johnson ", "email": "Alice@Example.com"});
    let parsed: Customer = parse_as(&customer, valid, None)?;
    println!("Parsed customer: {parsed:?}\n");

    let invalid = json!({
        "id": 0.5,
        "name": "   ",
        "email": "not-an-email",
        "tags": ["vip", "a-very-long-tag-name"]
    });

    let result = safe_parse(&customer, invalid.clone(), None);
    println!(
        "Collected {} issue(s) (typed: {}):",
        result.issues.as_ref().map_or(0, Vec::len),
        result.typed
    );
    let errors = flatten(result.issues.as_deref().unwrap_or_default());
    for (path, messages) in &errors.nested {
        for message in messages {
            println!("  {path}: {message}");
        }
    }

    let config = Config::new().with_abort_early(true);
    let result = safe_parse(&customer, invalid, Some(&config));
    if let Some(issue) = result.issues.as_ref().and_then(|issues| issues.first()) {
        println!(
            "\nWith abort_early only the first issue is kept: {}",
            issue.message
        );
    }

    Ok(())
}
