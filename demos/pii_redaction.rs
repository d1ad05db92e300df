//! PII redaction example
//!
//! Shows the masking presets and a custom group-anchored rule.
//!
//! Run with: cargo run --example pii_redaction

use rust_log_formatter::prelude::*;
use rust_log_formatter::group;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Log Formatter - PII Redaction Example ===\n");

    let sink = MemoryHandler::new();
    let logger = Logger::builder()
        .formatter(pii_formatter("user"))
        .formatter(ip_address_formatter("ip_address"))
        .formatter(format_by_group_key(["payment"], "card", |v| {
            let digits = v.as_str().unwrap_or_default();
            let hidden = digits.chars().count().saturating_sub(4);
            let last4: String = digits.chars().skip(hidden).collect();
            Value::string(format!("**** {}", last4))
        }))
        .sink(Arc::new(sink.clone()))
        .build()?;

    logger.info(
        "user signed in",
        vec![
            group!("user", {
                "id" => "bd57ffbd-8858-4cc4-a93b-426cef16de61",
                "email" => "foobar@example.com",
                group!("address", {
                    "street" => "1st street",
                    "city" => "New York",
                    "country" => "USA",
                    "zip" => 123456,
                }),
            }),
            group!("context", { "ip_address" => "10.20.30.40" }),
        ],
    );

    logger
        .with_group("payment")
        .info("charge", vec![Attr::new("card", "4111111111111111"), Attr::new("amount", 1999)]);

    for record in sink.records() {
        println!("{}", serde_json::to_string_pretty(&record.to_json_value())?);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
