//! Core formatter types and traits

pub mod attr;
pub mod engine;
pub mod error;
pub mod flatten;
pub mod formatter;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod timestamp;
pub mod value;

pub use attr::Attr;
pub use engine::{EngineConfig, FormatterEngine, FormatterEngineBuilder, DEFAULT_RESOLVE_PLACEHOLDER};
pub use error::{stderr_error_handler, ErrorHandler, FormatterError, Result};
pub use flatten::{
    flatten_attrs, flatten_attrs_with_prefix, prefix_attr_keys, FlattenOptions, Flattener,
    DEFAULT_SEPARATOR,
};
pub use formatter::{
    format, format_by_field_type, format_by_group, format_by_group_key,
    format_by_group_key_type, format_by_key, format_by_kind, format_by_type, Formatter,
};
pub use handler::Handler;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::FormatterMetrics;
pub use record::Record;
pub use timestamp::TimestampFormat;
pub use value::{
    AnyValue, FnValuer, Kind, LazyValue, LogValuer, LoggedError, Value, DEFAULT_MAX_RESOLVE_DEPTH,
};
