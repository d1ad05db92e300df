//! # Rust Log Formatter
//!
//! Rule-based rewriting of structured log attributes before they reach a sink.
//!
//! ## Features
//!
//! - **Composable Rules**: match attributes by key, kind, payload type or group path
//! - **Recursive Matching**: one rule reaches every nested occurrence of a field
//! - **Lazy Values**: deferred producers resolved under a configurable ceiling
//! - **Flattening**: collapse nested groups into prefixed, dotted keys
//! - **Presets**: PII and IP masking, timestamp rendering, error and HTTP expansion
//!
//! ## Example
//!
//! ```
//! use rust_log_formatter::prelude::*;
//! use std::sync::Arc;
//!
//! let sink = MemoryHandler::new();
//! let logger = Logger::builder()
//!     .formatter(ip_address_formatter("ip"))
//!     .formatter(format_by_key("password", |_| Value::from("<redacted>")))
//!     .sink(Arc::new(sink.clone()))
//!     .build()
//!     .unwrap();
//!
//! logger.info("login", vec![
//!     Attr::new("ip", "10.1.2.3"),
//!     Attr::group("form", vec![Attr::new("password", "hunter2")]),
//! ]);
//!
//! let record = sink.last().unwrap();
//! assert_eq!(record.attrs[0], Attr::new("ip", "*******"));
//! ```

pub mod core;
pub mod handlers;
pub mod macros;
pub mod presets;

pub mod prelude {
    pub use crate::core::{
        flatten_attrs, flatten_attrs_with_prefix, format, format_by_field_type, format_by_group,
        format_by_group_key, format_by_group_key_type, format_by_key, format_by_kind,
        format_by_type, prefix_attr_keys, Attr, EngineConfig, ErrorHandler, FlattenOptions,
        Flattener, Formatter, FormatterEngine, FormatterError, FormatterMetrics, Handler, Kind,
        LogLevel, LogValuer, LoggedError, Logger, LoggerBuilder, Record, Result, TimestampFormat,
        Value,
    };
    pub use crate::handlers::{FlattenHandler, FormatterHandler, MemoryHandler};
    pub use crate::presets::{
        error_formatter, http_request_formatter, http_response_formatter, ip_address_formatter,
        pii_formatter, time_formatter, timezone_converter, unix_timestamp_formatter,
        TimestampPrecision,
    };
}

pub use crate::core::{
    Attr, EngineConfig, FlattenOptions, Formatter, FormatterEngine, FormatterError, Handler, Kind,
    LogLevel, Logger, LoggerBuilder, Record, Result, Value,
};
pub use handlers::{FlattenHandler, FormatterHandler, MemoryHandler};
