//! Async validation example.
//!
//! Shows an object whose fields are checked against a (simulated) remote
//! lookup. The lookups start concurrently, and issues still come back in
//! field order.
//!
//! Run with:
//! ```bash
//! cargo run --example async_validation
//! ```

use futures::FutureExt;
use serde_json::json;
use shape_guard::prelude::*;
use std::time::Duration;

const TAKEN: &[&str] = &["admin", "root"];

async fn username_available(name: String) -> bool {
    tokio::time::sleep(Duration::from_millis(50)).await;
    !TAKEN.contains(&name.as_str())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let signup = object_async([
        (
            "username",
            pipe_async(string())
                .step(trim())
                .step(min_length(3))
                .step(check_async(
                    |value| {
                        let name = value.as_str().unwrap_or_default().to_string();
                        username_available(name).boxed()
                    },
                    "Username is already taken",
                ))
                .into_schema_ref(),
        ),
        (
            "referrer",
            optional_async(pipe_async(string()).step(check_async(
                |value| {
                    let name = value.as_str().unwrap_or_default().to_string();
                    async move { !username_available(name).await }.boxed()
                },
                "Unknown referrer",
            )))
            .into_schema_ref(),
        ),
        ("age", pipe(number()).step(min_value(13.0)).into_schema_ref()),
    ]);

    let started = std::time::Instant::now();
    let result = safe_parse_async(
        &signup,
        json!({"username": " admin ", "referrer": "nobody", "age": 12}),
        None,
    )
    .await;
    println!("Validated in {:?}", started.elapsed());

    for issue in result.issues.iter().flatten() {
        println!(
            "  {}: {}",
            issue.dot_path().unwrap_or_default(),
            issue.message
        );
    }

    let output = parse_async(&signup, json!({"username": "ada", "age": 36}), None).await?;
    println!("\nAccepted: {}", output);

    Ok(())
}
