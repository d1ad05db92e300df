//! Tagged attribute values
//!
//! A [`Value`] is one of a fixed set of primitive kinds, a group of nested
//! attributes, an opaque typed payload, or a lazy producer that resolves to
//! another value on demand.

use super::attr::Attr;
use super::error::{FormatterError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default ceiling on chained lazy value resolution
pub const DEFAULT_MAX_RESOLVE_DEPTH: usize = 100;

/// Tag identifying the category of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    String,
    Int64,
    Uint64,
    Float64,
    Bool,
    Duration,
    Time,
    Group,
    Any,
    Lazy,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

type DebugFn = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;

fn debug_payload<T: Any + fmt::Debug>(
    payload: &(dyn Any + Send + Sync),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match payload.downcast_ref::<T>() {
        Some(value) => fmt::Debug::fmt(value, f),
        None => f.write_str("<opaque>"),
    }
}

/// Opaque payload tagged with the type it was created from
#[derive(Clone)]
pub struct AnyValue {
    type_id: TypeId,
    type_name: &'static str,
    payload: Arc<dyn Any + Send + Sync>,
    debug: DebugFn,
}

impl AnyValue {
    pub fn new<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            payload: Arc::new(value),
            debug: debug_payload::<T>,
        }
    }

    /// Type identifier captured at construction
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }
        (*self.payload).downcast_ref::<T>()
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.payload, f)
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && Arc::ptr_eq(&self.payload, &other.payload)
    }
}

/// A deferred producer of a [`Value`]
///
/// Implementations must be cheap to call repeatedly; the producer may return
/// another lazy value, which is resolved in turn up to a depth ceiling.
pub trait LogValuer: Send + Sync {
    fn log_value(&self) -> Value;
}

/// Adapter turning a closure into a [`LogValuer`]
pub struct FnValuer<F>(pub F);

impl<F> LogValuer for FnValuer<F>
where
    F: Fn() -> Value + Send + Sync,
{
    fn log_value(&self) -> Value {
        (self.0)()
    }
}

/// Shared handle to a [`LogValuer`]
#[derive(Clone)]
pub struct LazyValue(Arc<dyn LogValuer>);

impl LazyValue {
    pub fn new(valuer: impl LogValuer + 'static) -> Self {
        Self(Arc::new(valuer))
    }

    /// Run the producer once, without resolving what it returns
    pub fn produce(&self) -> Value {
        self.0.log_value()
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyValue(..)")
    }
}

impl PartialEq for LazyValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Rendered form of a `std::error::Error`, carried as an [`AnyValue`] payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedError {
    pub message: String,
    pub type_name: &'static str,
    pub sources: Vec<String>,
}

impl LoggedError {
    pub fn new<E: std::error::Error + 'static>(err: &E) -> Self {
        let mut sources = Vec::new();
        let mut current = err.source();
        while let Some(source) = current {
            sources.push(source.to_string());
            current = source.source();
        }

        Self {
            message: err.to_string(),
            type_name: std::any::type_name::<E>(),
            sources,
        }
    }
}

/// Attribute value
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<FixedOffset>),
    Group(Vec<Attr>),
    Any(AnyValue),
    Lazy(LazyValue),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Int64(_) => Kind::Int64,
            Value::Uint64(_) => Kind::Uint64,
            Value::Float64(_) => Kind::Float64,
            Value::Bool(_) => Kind::Bool,
            Value::Duration(_) => Kind::Duration,
            Value::Time(_) => Kind::Time,
            Value::Group(_) => Kind::Group,
            Value::Any(_) => Kind::Any,
            Value::Lazy(_) => Kind::Lazy,
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Self {
        Value::Group(attrs.into_iter().collect())
    }

    /// Wrap an arbitrary typed payload
    pub fn any<T: Any + Send + Sync + fmt::Debug>(value: T) -> Self {
        Value::Any(AnyValue::new(value))
    }

    pub fn lazy(valuer: impl LogValuer + 'static) -> Self {
        Value::Lazy(LazyValue::new(valuer))
    }

    pub fn lazy_fn<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Value::Lazy(LazyValue::new(FnValuer(f)))
    }

    /// Capture an error as a [`LoggedError`] payload
    pub fn error<E: std::error::Error + 'static>(err: E) -> Self {
        Value::any(LoggedError::new(&err))
    }

    /// Children of a group value
    ///
    /// # Panics
    ///
    /// Panics if the value is not a group. Use [`Value::try_group`] to get an
    /// [`FormatterError::InvalidKind`] instead.
    pub fn group_attrs(&self) -> &[Attr] {
        match self.try_group() {
            Ok(attrs) => attrs,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_group(&self) -> Result<&[Attr]> {
        match self {
            Value::Group(attrs) => Ok(attrs),
            other => Err(FormatterError::invalid_kind(Kind::Group, other.kind())),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    /// Resolved payload as `&T`
    ///
    /// Scalars expose their Rust representation (`String`, `i64`, `u64`,
    /// `f64`, `bool`, `Duration`, `DateTime<FixedOffset>`); `Any` values
    /// expose their payload. Groups and unresolved lazies never match.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let payload: &dyn Any = match self {
            Value::String(v) => v,
            Value::Int64(v) => v,
            Value::Uint64(v) => v,
            Value::Float64(v) => v,
            Value::Bool(v) => v,
            Value::Duration(v) => v,
            Value::Time(v) => v,
            Value::Any(v) => return v.downcast_ref::<T>(),
            Value::Group(_) | Value::Lazy(_) => return None,
        };
        payload.downcast_ref::<T>()
    }

    /// Resolve lazy values until a non-lazy kind is reached
    ///
    /// Fails with [`FormatterError::RecursionLimit`] when more than
    /// `max_depth` producers are chained.
    pub fn resolve(self, max_depth: usize) -> Result<Value> {
        let mut value = self;
        let mut depth = 0;
        while let Value::Lazy(lazy) = value {
            if depth >= max_depth {
                return Err(FormatterError::recursion_limit(max_depth));
            }
            value = lazy.produce();
            depth += 1;
        }
        Ok(value)
    }

    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int64(i) => serde_json::Value::Number((*i).into()),
            Value::Uint64(u) => serde_json::Value::Number((*u).into()),
            Value::Float64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Duration(d) => {
                serde_json::Value::Number(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX).into())
            }
            Value::Time(t) => serde_json::Value::String(t.to_rfc3339()),
            Value::Group(attrs) => serde_json::Value::Object(
                attrs
                    .iter()
                    .map(|attr| (attr.key.clone(), attr.value.to_json_value()))
                    .collect(),
            ),
            Value::Any(any) => serde_json::Value::String(format!("{:?}", any)),
            Value::Lazy(lazy) => match lazy.produce().resolve(DEFAULT_MAX_RESOLVE_DEPTH) {
                Ok(value) => value.to_json_value(),
                Err(_) => serde_json::Value::Null,
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Uint64(a), Value::Uint64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b && a.offset() == b.offset(),
            (Value::Group(a), Value::Group(b)) => a == b,
            (Value::Any(a), Value::Any(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Uint64(u) => write!(f, "{}", u),
            Value::Float64(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}={}", attr.key, attr.value)?;
                }
                f.write_str("]")
            }
            Value::Any(any) => write!(f, "{:?}", any),
            Value::Lazy(_) => f.write_str("<lazy>"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int64(i as i64)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint64(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint64(u as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Value::Time(t)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t.fixed_offset())
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}
