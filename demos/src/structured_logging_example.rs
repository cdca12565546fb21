//! Structured logging, localized messages and result caching.
//!
//! Run with:
//! ```bash
//! RUST_LOG=shape_guard=debug cargo run --example structured_logging_example
//! ```

use serde_json::json;
use shape_guard::logging::setup::{init_logging, LoggingConfig};
use shape_guard::prelude::*;
use std::sync::Arc;
use tracing::info;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::development().with_json_format(true))?;

    let registry = Arc::new(Registry::new());
    registry.set_global_config(Config::new().with_lang("de"));
    registry.set_specific_message(Identity::new("string"), "Bitte Text eingeben", Some("de"));
    registry.set_specific_message(
        Identity::new("min_length"),
        Message::dynamic(|issue| {
            format!(
                "Mindestens {} Zeichen",
                issue.expected.as_deref().unwrap_or("?").trim_start_matches(">=")
            )
        }),
        Some("de"),
    );
    registry.set_global_message("Ungültige Eingabe", Some("de"));

    let profile = cached(
        object([
            ("handle", boxed(pipe(string()).step(min_length(4)))),
            ("bio", boxed(nullable(string()))),
            ("score", boxed(number())),
        ]),
        CacheOptions::default().with_max_size(64),
    )?
    .with_log_config(LogConfig::verbose());

    let config = Config::new().with_registry(Arc::clone(&registry));
    let input = json!({"handle": "ab", "bio": 7, "score": "high"});

    for attempt in 1..=2 {
        let result = safe_parse(&profile, input.clone(), Some(&config));
        info!(attempt, success = result.success, "Validated profile");
        result.log_issues(&LogConfig::verbose());
    }

    let stats = profile.cache().stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        entries = stats.total_entries,
        "Cache statistics"
    );

    Ok(())
}
