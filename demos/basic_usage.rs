//! Basic formatter usage example
//!
//! Builds a logger with a few rules and prints the captured records as JSON.
//!
//! Run with: cargo run --example basic_usage

use rust_log_formatter::prelude::*;
use rust_log_formatter::{attrs, group};
use std::sync::Arc;
use std::time::Duration;

fn print_records(sink: &MemoryHandler) {
    for record in sink.records() {
        println!("   {}", record.to_json_value());
    }
    sink.clear();
}

fn main() -> Result<()> {
    println!("=== Rust Log Formatter - Basic Usage Example ===\n");

    let sink = MemoryHandler::new();
    let logger = Logger::builder()
        .formatter(format_by_kind(Kind::Duration, |v| match v {
            Value::Duration(d) => Value::string(format!("{:.3}s", d.as_secs_f64())),
            other => other.clone(),
        }))
        .formatter(time_formatter(TimestampFormat::Rfc3339, None))
        .formatter(error_formatter("error"))
        .sink(Arc::new(sink.clone()))
        .build()?;

    println!("1. Kind-based rules reach nested values:");
    logger.info(
        "request handled",
        attrs! {
            "path" => "/orders",
            group!("timing", {
                "db" => Duration::from_millis(42),
                "total" => Duration::from_millis(118),
            }),
        },
    );
    print_records(&sink);

    println!("\n2. Errors expand into message, type and sources:");
    let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
    logger.error("write failed", vec![Attr::error("error", err)]);
    print_records(&sink);

    println!("\n3. Groups opened on the logger nest later attributes:");
    let scoped = logger
        .with(vec![Attr::new("service", "billing")])
        .with_group("job");
    scoped.warn(
        "slow job",
        vec![
            Attr::new("started", chrono::Utc::now()),
            Attr::duration("elapsed", Duration::from_secs(3)),
        ],
    );
    print_records(&sink);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
