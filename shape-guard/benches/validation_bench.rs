//! Benchmarks for schema validation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shape_guard::prelude::*;
use std::hint::black_box;
use tokio::runtime::Runtime;

fn order_schema() -> ObjectSchema {
    object([
        ("id", boxed(pipe(number()).step(integer()))),
        (
            "customer",
            boxed(object([
                ("name", boxed(pipe(string()).step(min_length(1)))),
                ("email", boxed(pipe(string()).step(regex(r"^[^@]+@[^@]+$").unwrap()))),
            ])),
        ),
        (
            "lines",
            boxed(array(object([
                ("sku", boxed(string())),
                ("quantity", boxed(pipe(number()).step(min_value(1.0)))),
            ]))),
        ),
        ("note", boxed(optional(string()))),
    ])
}

fn order_input(lines: usize) -> serde_json::Value {
    let lines: Vec<_> = (0..lines)
        .map(|i| json!({"sku": format!("sku_{i}"), "quantity": (i % 5) + 1}))
        .collect();
    json!({
        "id": 42,
        "customer": {"name": "Ada", "email": "ada@example.com"},
        "lines": lines,
    })
}

fn benchmark_object_parse(c: &mut Criterion) {
    let schema = order_schema();
    let mut group = c.benchmark_group("object_parse");

    for lines in [1, 10, 100, 1000].iter() {
        let input = order_input(*lines);
        group.bench_with_input(BenchmarkId::new("valid", lines), &input, |b, input| {
            b.iter(|| safe_parse(&schema, black_box(input.clone()), None))
        });
    }

    let invalid = json!({"id": 1.5, "customer": {"name": "", "email": "nope"}, "lines": [{}]});
    group.bench_function("invalid_collect_all", |b| {
        b.iter(|| safe_parse(&schema, black_box(invalid.clone()), None))
    });
    let config = Config::new().with_abort_early(true);
    group.bench_function("invalid_abort_early", |b| {
        b.iter(|| safe_parse(&schema, black_box(invalid.clone()), Some(&config)))
    });

    group.finish();
}

fn benchmark_union(c: &mut Criterion) {
    let schema = union(vec![
        boxed(string()),
        boxed(boolean()),
        boxed(date()),
        boxed(pipe(number()).step(integer())),
    ]);
    let mut group = c.benchmark_group("union");

    group.bench_function("first_candidate", |b| {
        b.iter(|| safe_parse(&schema, black_box("text"), None))
    });
    group.bench_function("last_candidate", |b| {
        b.iter(|| safe_parse(&schema, black_box(7), None))
    });
    group.bench_function("no_candidate", |b| {
        b.iter(|| safe_parse(&schema, black_box(json!(null)), None))
    });

    group.finish();
}

fn benchmark_cached_vs_uncached(c: &mut Criterion) {
    let input = order_input(100);
    let uncached = order_schema();
    let memoized = cached(order_schema(), CacheOptions::default().with_max_size(16)).unwrap();
    let mut group = c.benchmark_group("cache");

    group.bench_function("uncached", |b| {
        b.iter(|| safe_parse(&uncached, black_box(input.clone()), None))
    });
    group.bench_function("cached_hit", |b| {
        b.iter(|| safe_parse(&memoized, black_box(input.clone()), None))
    });

    group.finish();
}

fn benchmark_async_object(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let schema = object_async([
        ("name", string().into_schema_ref()),
        ("tags", array_async(string().into_schema_ref()).into_schema_ref()),
    ]);
    let input = json!({"name": "a", "tags": ["x", "y", "z"]});

    c.bench_function("async_object_parse", |b| {
        b.to_async(&rt)
            .iter(|| safe_parse_async(&schema, black_box(input.clone()), None))
    });
}

criterion_group!(
    benches,
    benchmark_object_parse,
    benchmark_union,
    benchmark_cached_vs_uncached,
    benchmark_async_object
);
criterion_main!(benches);
