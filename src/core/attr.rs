//! Key-value attributes attached to log records

use super::value::{LogValuer, Value};
use chrono::{DateTime, FixedOffset};
use std::any::Any;
use std::fmt;
use std::time::Duration;

/// A named value attached to a log record
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Int64(value))
    }

    pub fn uint64(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::Uint64(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::Float64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<FixedOffset>) -> Self {
        Self::new(key, Value::Time(value))
    }

    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, Value::group(attrs))
    }

    pub fn any<T: Any + Send + Sync + fmt::Debug>(key: impl Into<String>, value: T) -> Self {
        Self::new(key, Value::any(value))
    }

    pub fn error<E: std::error::Error + 'static>(key: impl Into<String>, err: E) -> Self {
        Self::new(key, Value::error(err))
    }

    pub fn lazy(key: impl Into<String>, valuer: impl LogValuer + 'static) -> Self {
        Self::new(key, Value::lazy(valuer))
    }

    /// Same key, different value
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            key: self.key.clone(),
            value,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
