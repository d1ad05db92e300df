//! Ready-made formatter rules

pub mod error;
pub mod http;
pub mod pii;
pub mod time;

pub use error::error_formatter;
pub use self::http::{http_request_formatter, http_response_formatter, HIDDEN_HEADERS};
pub use pii::{ip_address_formatter, pii_formatter, MASK};
pub use time::{time_formatter, timezone_converter, unix_timestamp_formatter, TimestampPrecision};
