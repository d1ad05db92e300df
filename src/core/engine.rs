//! Rule chain traversal engine
//!
//! Applies an ordered list of [`Formatter`]s to every top-level attribute of a
//! record. Each rule sees the value produced by the rules before it; group
//! descent is the business of the rules themselves.

use super::attr::Attr;
use super::error::{stderr_error_handler, ErrorHandler, FormatterError, Result};
use super::formatter::Formatter;
use super::metrics::FormatterMetrics;
use super::value::{Value, DEFAULT_MAX_RESOLVE_DEPTH};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Value substituted for a lazy attribute that could not be resolved
pub const DEFAULT_RESOLVE_PLACEHOLDER: &str = "!RECURSION_LIMIT";

/// Engine configuration
///
/// # Example
///
/// ```
/// use rust_log_formatter::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{"max_resolve_depth": 8}"#).unwrap();
/// assert_eq!(config.max_resolve_depth, 8);
/// assert_eq!(config.resolve_placeholder, "!RECURSION_LIMIT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of chained lazy producers resolved for one attribute
    pub max_resolve_depth: usize,
    /// String value emitted in place of an unresolvable lazy attribute
    pub resolve_placeholder: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
            resolve_placeholder: DEFAULT_RESOLVE_PLACEHOLDER.to_string(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_resolve_depth(mut self, depth: usize) -> Self {
        self.max_resolve_depth = depth;
        self
    }

    #[must_use]
    pub fn with_resolve_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.resolve_placeholder = placeholder.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_resolve_depth == 0 {
            return Err(FormatterError::config(
                "EngineConfig",
                "max_resolve_depth must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Applies a rule chain to attribute lists
pub struct FormatterEngine {
    formatters: Vec<Formatter>,
    config: EngineConfig,
    on_error: ErrorHandler,
    metrics: Arc<FormatterMetrics>,
}

impl FormatterEngine {
    /// Create an engine with the default configuration
    #[must_use]
    pub fn new(formatters: Vec<Formatter>) -> Self {
        Self {
            formatters,
            config: EngineConfig::default(),
            on_error: stderr_error_handler(),
            metrics: Arc::new(FormatterMetrics::new()),
        }
    }

    #[must_use]
    pub fn builder() -> FormatterEngineBuilder {
        FormatterEngineBuilder::new()
    }

    pub fn formatters(&self) -> &[Formatter] {
        &self.formatters
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &FormatterMetrics {
        &self.metrics
    }

    /// Transform a list of attributes located under `groups`
    ///
    /// Keys, order and length are preserved; only values change.
    pub fn transform_attrs(&self, groups: &[String], attrs: &[Attr]) -> Vec<Attr> {
        attrs
            .iter()
            .map(|attr| self.transform_attr(groups, attr))
            .collect()
    }

    /// Resolve `attr` and run it through the rule chain
    pub fn transform_attr(&self, groups: &[String], attr: &Attr) -> Attr {
        self.metrics.record_attr();

        let value = self
            .resolve_tree(&attr.value)
            .unwrap_or_else(|| attr.value.clone());

        let mut current = attr.with_value(value);
        for formatter in &self.formatters {
            if let Some(value) = self.apply_isolated(formatter, groups, &current) {
                current.value = value;
            }
        }
        current
    }

    /// Resolve every lazy value in the tree under the configured ceiling
    ///
    /// Returns `None` when nothing had to change. A lazy value that does not
    /// settle is reported and replaced with the placeholder; its siblings
    /// are resolved independently.
    fn resolve_tree(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Lazy(_) => {
                let resolved = match value.clone().resolve(self.config.max_resolve_depth) {
                    Ok(resolved) => resolved,
                    Err(err) => {
                        self.metrics.record_resolve_failure();
                        (self.on_error)(&err);
                        return Some(Value::String(self.config.resolve_placeholder.clone()));
                    }
                };
                Some(self.resolve_tree(&resolved).unwrap_or(resolved))
            }
            Value::Group(children) => {
                let mut rewritten: Option<Vec<Attr>> = None;
                for (index, child) in children.iter().enumerate() {
                    if let Some(value) = self.resolve_tree(&child.value) {
                        rewritten.get_or_insert_with(|| children.clone())[index] =
                            child.with_value(value);
                    }
                }
                rewritten.map(Value::Group)
            }
            _ => None,
        }
    }

    /// Run one rule, converting errors and panics into reports
    fn apply_isolated(&self, formatter: &Formatter, groups: &[String], attr: &Attr) -> Option<Value> {
        let result = catch_unwind(AssertUnwindSafe(|| formatter.apply(groups, attr)));

        match result {
            Ok(Ok(Some(value))) => {
                self.metrics.record_applied();
                Some(value)
            }
            Ok(Ok(None)) => None,
            Ok(Err(err)) => {
                self.metrics.record_rule_failure();
                (self.on_error)(&FormatterError::rule_failed(
                    formatter.name(),
                    format!("{} (attribute '{}')", err, attr.key),
                ));
                None
            }
            Err(panic_info) => {
                self.metrics.record_rule_failure();
                (self.on_error)(&FormatterError::rule_failed(
                    formatter.name(),
                    format!(
                        "panicked on attribute '{}': {}",
                        attr.key,
                        panic_message(&*panic_info)
                    ),
                ));
                None
            }
        }
    }
}

impl fmt::Debug for FormatterEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterEngine")
            .field("formatters", &self.formatters)
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for constructing a [`FormatterEngine`] with a fluent API
///
/// # Example
/// ```
/// use rust_log_formatter::prelude::*;
/// use std::sync::Arc;
///
/// let engine = FormatterEngine::builder()
///     .formatter(format_by_key("password", |_| Value::from("***")))
///     .max_resolve_depth(16)
///     .on_error(Arc::new(|err: &FormatterError| eprintln!("formatter: {}", err)))
///     .build()
///     .unwrap();
/// assert_eq!(engine.formatters().len(), 1);
/// ```
pub struct FormatterEngineBuilder {
    formatters: Vec<Formatter>,
    config: EngineConfig,
    on_error: Option<ErrorHandler>,
}

impl FormatterEngineBuilder {
    pub fn new() -> Self {
        Self {
            formatters: Vec::new(),
            config: EngineConfig::default(),
            on_error: None,
        }
    }

    /// Append a rule to the chain
    #[must_use = "builder methods return a new value"]
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatters.push(formatter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatters(mut self, formatters: impl IntoIterator<Item = Formatter>) -> Self {
        self.formatters.extend(formatters);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_resolve_depth(mut self, depth: usize) -> Self {
        self.config.max_resolve_depth = depth;
        self
    }

    /// Set the channel receiving rule and resolution failures
    ///
    /// Defaults to a tagged line on stderr.
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    pub fn build(self) -> Result<FormatterEngine> {
        self.config.validate()?;

        Ok(FormatterEngine {
            formatters: self.formatters,
            config: self.config,
            on_error: self.on_error.unwrap_or_else(stderr_error_handler),
            metrics: Arc::new(FormatterMetrics::new()),
        })
    }
}

impl Default for FormatterEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::{format_by_key, format_by_kind};
    use crate::core::value::{Kind, LogValuer};
    use parking_lot::Mutex;

    fn collecting_engine(
        formatters: Vec<Formatter>,
        max_resolve_depth: usize,
    ) -> (FormatterEngine, Arc<Mutex<Vec<String>>>) {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let engine = FormatterEngine::builder()
            .formatters(formatters)
            .max_resolve_depth(max_resolve_depth)
            .on_error(Arc::new(move |err: &FormatterError| {
                sink.lock().push(err.to_string());
            }))
            .build()
            .unwrap();
        (engine, errors)
    }

    struct Forever;

    impl LogValuer for Forever {
        fn log_value(&self) -> Value {
            Value::lazy(Forever)
        }
    }

    #[test]
    fn test_chain_sees_previous_output() {
        let engine = FormatterEngine::new(vec![
            format_by_key("x", |v| Value::string(format!("{}-first", v))),
            format_by_key("x", |v| Value::string(format!("{}-second", v))),
        ]);

        let out = engine.transform_attr(&[], &Attr::new("x", "v"));
        assert_eq!(out.value, Value::from("v-first-second"));
    }

    #[test]
    fn test_order_and_keys_preserved() {
        let engine = FormatterEngine::new(vec![format_by_kind(Kind::Int64, |_| {
            Value::from("n")
        })]);

        let attrs = vec![
            Attr::new("c", 1),
            Attr::new("a", "s"),
            Attr::new("b", 2),
        ];
        let out = engine.transform_attrs(&[], &attrs);

        let keys: Vec<&str> = out.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(out[1].value, Value::from("s"));
        assert_eq!(out[2].value, Value::from("n"));
        assert_eq!(attrs[0].value, Value::from(1));
    }

    #[test]
    fn test_lazy_resolved_before_rules() {
        let engine = FormatterEngine::new(vec![format_by_kind(Kind::String, |v| {
            Value::string(format!("<{}>", v))
        })]);

        let out = engine.transform_attr(&[], &Attr::new("k", Value::lazy_fn(|| Value::from("v"))));
        assert_eq!(out.value, Value::from("<v>"));
    }

    #[test]
    fn test_recursion_limit_reported_and_placeholder_emitted() {
        let (engine, errors) = collecting_engine(vec![], 5);

        let attrs = vec![Attr::lazy("bad", Forever), Attr::new("good", 1)];
        let out = engine.transform_attrs(&[], &attrs);

        assert_eq!(out[0].value, Value::from(DEFAULT_RESOLVE_PLACEHOLDER));
        assert_eq!(out[1].value, Value::from(1));
        assert_eq!(errors.lock().len(), 1);
        assert!(errors.lock()[0].contains("exceeded 5"));
        assert_eq!(engine.metrics().resolve_failures(), 1);
    }

    struct Chain(usize);

    impl LogValuer for Chain {
        fn log_value(&self) -> Value {
            match self.0 {
                0 => Value::from("deep"),
                n => Value::lazy(Chain(n - 1)),
            }
        }
    }

    #[test]
    fn test_nested_unresolvable_lazy_does_not_block_siblings() {
        let (engine, errors) = collecting_engine(
            vec![format_by_key("x", |v| Value::string(format!("seen {}", v)))],
            5,
        );

        let attr = Attr::group("g", vec![Attr::lazy("bad", Forever), Attr::new("x", "v")]);
        let out = engine.transform_attr(&[], &attr);

        assert_eq!(
            out.value,
            Value::group(vec![
                Attr::new("bad", DEFAULT_RESOLVE_PLACEHOLDER),
                Attr::new("x", "seen v"),
            ])
        );
        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("exceeded 5 steps"));
        assert_eq!(engine.metrics().resolve_failures(), 1);
        assert_eq!(engine.metrics().rule_failures(), 0);
    }

    #[test]
    fn test_nested_lazy_bounded_by_configured_ceiling() {
        let (engine, errors) = collecting_engine(
            vec![format_by_key("x", |v| Value::string(format!("seen {}", v)))],
            5,
        );

        let long = Attr::group("g", vec![Attr::lazy("x", Chain(50))]);
        assert_eq!(
            engine.transform_attr(&[], &long).value,
            Value::group(vec![Attr::new("x", format!("seen {}", DEFAULT_RESOLVE_PLACEHOLDER))])
        );
        assert_eq!(errors.lock().len(), 1);

        let short = Attr::group("g", vec![Attr::lazy("x", Chain(3))]);
        assert_eq!(
            engine.transform_attr(&[], &short).value,
            Value::group(vec![Attr::new("x", "seen deep")])
        );
        assert_eq!(errors.lock().len(), 1);
    }

    #[test]
    fn test_lazy_resolving_to_group_with_lazy_children() {
        let engine = FormatterEngine::new(vec![]);
        let attr = Attr::new(
            "outer",
            Value::lazy_fn(|| {
                Value::group(vec![Attr::new("inner", Value::lazy_fn(|| Value::from(7)))])
            }),
        );

        assert_eq!(
            engine.transform_attr(&[], &attr).value,
            Value::group(vec![Attr::new("inner", 7)])
        );
    }

    #[test]
    fn test_failing_rule_is_isolated() {
        let failing = Formatter::new("always_fails", |_, _| {
            Err(FormatterError::other("unexpected payload"))
        });
        let (engine, errors) = collecting_engine(
            vec![
                failing,
                format_by_key("k", |v| Value::string(format!("{}!", v))),
            ],
            DEFAULT_MAX_RESOLVE_DEPTH,
        );

        let out = engine.transform_attrs(&[], &[Attr::new("k", "v"), Attr::new("j", "w")]);
        assert_eq!(out[0].value, Value::from("v!"));
        assert_eq!(out[1].value, Value::from("w"));
        assert_eq!(errors.lock().len(), 2);
        assert!(errors.lock()[0].contains("always_fails"));
        assert_eq!(engine.metrics().rule_failures(), 2);
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let panicking = format_by_key("k", |_| panic!("bad rule"));
        let (engine, errors) = collecting_engine(vec![panicking], DEFAULT_MAX_RESOLVE_DEPTH);

        let out = engine.transform_attrs(&[], &[Attr::new("k", "v"), Attr::new("j", "w")]);
        assert_eq!(out[0].value, Value::from("v"));
        assert_eq!(out[1].value, Value::from("w"));

        let errors = errors.lock();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("bad rule"));
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let (engine, errors) = collecting_engine(
            vec![format_by_key("absent", |_| Value::from("x"))],
            DEFAULT_MAX_RESOLVE_DEPTH,
        );

        engine.transform_attrs(&[], &[Attr::new("k", "v")]);
        assert!(errors.lock().is_empty());
        assert_eq!(engine.metrics().rules_applied(), 0);
        assert_eq!(engine.metrics().attrs_processed(), 1);
    }

    #[test]
    fn test_config_validation() {
        let err = FormatterEngine::builder().max_resolve_depth(0).build().unwrap_err();
        assert!(matches!(err, FormatterError::InvalidConfiguration { .. }));

        assert!(EngineConfig::from_json(r#"{"max_resolve_depth": 0}"#).is_err());
        assert!(EngineConfig::from_json("not json").is_err());

        let config = EngineConfig::from_json(r#"{"resolve_placeholder": "?"}"#).unwrap();
        assert_eq!(config.max_resolve_depth, DEFAULT_MAX_RESOLVE_DEPTH);
        assert_eq!(config.resolve_placeholder, "?");
    }
}
