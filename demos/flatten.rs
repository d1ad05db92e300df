//! Flattening example
//!
//! Collapses nested groups into prefixed keys, both directly and inside a
//! logger pipeline.
//!
//! Run with: cargo run --example flatten

use rust_log_formatter::prelude::*;
use rust_log_formatter::{attrs, group};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Log Formatter - Flatten Example ===\n");

    let tree = attrs! {
        "a" => 1,
        group!("g", {
            "b" => 2,
            group!("h", { "c" => 3 }),
        }),
    };

    println!("1. Path-preserving with prefix:");
    for attr in flatten_attrs_with_prefix(".", "attrs", &tree) {
        println!("   {}", attr);
    }

    println!("\n2. Path-ignoring:");
    for attr in flatten_attrs(&tree) {
        println!("   {}", attr);
    }

    println!("\n3. Prefixing keys without flattening:");
    for attr in prefix_attr_keys("ctx_", &tree) {
        println!("   {}", attr);
    }

    println!("\n4. Inside a logger pipeline:");
    let sink = MemoryHandler::new();
    let options: FlattenOptions = serde_json::from_str(r#"{"separator": "_"}"#)?;
    let logger = Logger::builder()
        .formatter(ip_address_formatter("ip"))
        .flatten(options)
        .sink(Arc::new(sink.clone()))
        .build()?;

    logger
        .with_group("http")
        .info("request", vec![group!("client", { "ip" => "10.0.0.7", "agent" => "curl" })]);

    for record in sink.records() {
        println!("   {}", record.to_json_value());
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
