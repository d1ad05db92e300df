//! Criterion benchmarks for rust_log_formatter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_log_formatter::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn nested(depth: usize) -> Vec<Attr> {
    let mut attrs = vec![
        Attr::new("email", "someone@example.com"),
        Attr::duration("elapsed", Duration::from_millis(12)),
        Attr::new("count", 3),
    ];
    for level in (0..depth).rev() {
        attrs = vec![
            Attr::new("id", level as u64),
            Attr::group(format!("level{}", level), attrs),
        ];
    }
    attrs
}

// ============================================================================
// Rule Matching Benchmarks
// ============================================================================

fn bench_rule_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_matching");
    group.throughput(Throughput::Elements(1));

    let attrs = nested(3);
    let rules = [
        ("by_key", format_by_key("email", |_| Value::from("***"))),
        ("by_kind", format_by_kind(Kind::Duration, |_| Value::from("d"))),
        ("by_type", format_by_type::<Duration, _>(|d| Value::Int64(d.as_millis() as i64))),
        ("by_key_miss", format_by_key("absent", |_| Value::from("***"))),
    ];

    for (name, rule) in &rules {
        group.bench_function(*name, |b| {
            b.iter(|| {
                for attr in &attrs {
                    black_box(rule.apply(&[], black_box(attr)).ok());
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Engine Benchmarks
// ============================================================================

fn bench_engine_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_depth");

    let engine = FormatterEngine::new(vec![
        pii_formatter("email"),
        ip_address_formatter("ip"),
        time_formatter(TimestampFormat::Iso8601, None),
    ]);

    for depth in [0usize, 2, 8] {
        let attrs = nested(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &attrs, |b, attrs| {
            b.iter(|| black_box(engine.transform_attrs(&[], black_box(attrs))));
        });
    }

    group.finish();
}

// ============================================================================
// Flatten Benchmarks
// ============================================================================

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    let attrs = nested(4);

    group.bench_function("with_prefix", |b| {
        b.iter(|| black_box(flatten_attrs_with_prefix(".", "attrs", black_box(&attrs))));
    });

    group.bench_function("ignore_path", |b| {
        b.iter(|| black_box(flatten_attrs(black_box(&attrs))));
    });

    group.finish();
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    let sink = MemoryHandler::new();
    let logger = Logger::builder()
        .formatter(pii_formatter("user"))
        .flatten(FlattenOptions::new())
        .sink(Arc::new(sink.clone()))
        .build()
        .expect("valid logger");

    group.bench_function("info_with_user", |b| {
        b.iter(|| {
            logger.info(
                black_box("request handled"),
                vec![Attr::group(
                    "user",
                    vec![Attr::new("id", 7), Attr::new("email", "foobar@example.com")],
                )],
            );
            sink.clear();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rule_matching,
    bench_engine_depth,
    bench_flatten,
    bench_pipeline
);
criterion_main!(benches);
