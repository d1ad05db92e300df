//! Logger front-end
//!
//! A [`Logger`] turns calls into [`Record`]s and hands them to a handler
//! pipeline, usually `FormatterHandler -> [FlattenHandler] -> sink`.

use super::{
    attr::Attr,
    engine::{EngineConfig, FormatterEngine},
    error::{ErrorHandler, FormatterError, Result},
    flatten::FlattenOptions,
    formatter::Formatter,
    handler::Handler,
    log_level::LogLevel,
    record::Record,
};
use crate::handlers::{FlattenHandler, FormatterHandler};
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    #[must_use]
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_log_formatter::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let sink = MemoryHandler::new();
    /// let logger = Logger::builder()
    ///     .formatter(pii_formatter("user"))
    ///     .sink(Arc::new(sink.clone()))
    ///     .build()
    ///     .unwrap();
    ///
    /// logger.info("signed in", vec![Attr::group("user", vec![Attr::new("email", "foobar@example.com")])]);
    /// let record = sink.last().unwrap();
    /// assert_eq!(record.attrs[0].value.group_attrs()[0].value, Value::from("foob*******"));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Logger whose records carry `attrs` in addition to their own
    #[must_use]
    pub fn with(&self, attrs: Vec<Attr>) -> Logger {
        if attrs.is_empty() {
            return self.clone();
        }
        Logger::new(self.handler.with_attrs(attrs))
    }

    /// Logger whose subsequent attributes are nested under `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        Logger::new(self.handler.with_group(name))
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, attrs: Vec<Attr>) {
        let record = Record::new(level, message).with_attrs(attrs);
        if let Err(e) = self.handler.handle(record) {
            eprintln!(
                "[LOGGER ERROR] Handler '{}' failed: {}",
                self.handler.name(),
                e
            );
        }
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(LogLevel::Trace, message, attrs);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(LogLevel::Debug, message, attrs);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(LogLevel::Info, message, attrs);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(LogLevel::Warn, message, attrs);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(LogLevel::Error, message, attrs);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(LogLevel::Fatal, message, attrs);
    }
}

/// Builder assembling a handler pipeline in front of a sink
///
/// Records pass through the formatter rules first, then the optional
/// flatten stage, then reach the sink.
pub struct LoggerBuilder {
    sink: Option<Arc<dyn Handler>>,
    formatters: Vec<Formatter>,
    engine_config: EngineConfig,
    on_error: Option<ErrorHandler>,
    flatten: Option<FlattenOptions>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            sink: None,
            formatters: Vec::new(),
            engine_config: EngineConfig::default(),
            on_error: None,
            flatten: None,
        }
    }

    /// Set the handler receiving the final records
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn Handler>) -> Self {
        self.sink = Some(sink);
        self
    }

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
    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    /// Flatten attributes before they reach the sink
    #[must_use = "builder methods return a new value"]
    pub fn flatten(mut self, options: FlattenOptions) -> Self {
        self.flatten = Some(options);
        self
    }

    pub fn build(self) -> Result<Logger> {
        let sink = self
            .sink
            .ok_or_else(|| FormatterError::config("LoggerBuilder", "no sink configured"))?;

        let mut handler = sink;

        if let Some(options) = self.flatten {
            let mut flatten = FlattenHandler::new(options, handler);
            if let Some(on_error) = &self.on_error {
                flatten = flatten.on_error(Arc::clone(on_error));
            }
            handler = Arc::new(flatten);
        }

        if !self.formatters.is_empty() {
            let mut engine = FormatterEngine::builder()
                .formatters(self.formatters)
                .config(self.engine_config);
            if let Some(on_error) = self.on_error {
                engine = engine.on_error(on_error);
            }
            handler = Arc::new(FormatterHandler::new(Arc::new(engine.build()?), handler));
        }

        Ok(Logger::new(handler))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::format_by_key;
    use crate::core::value::Value;
    use crate::handlers::MemoryHandler;

    #[test]
    fn test_builder_requires_sink() {
        let err = Logger::builder().build().err().unwrap();
        assert!(matches!(err, FormatterError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_builder_without_rules_passes_through() {
        let sink = MemoryHandler::new();
        let logger = Logger::builder().sink(Arc::new(sink.clone())).build().unwrap();

        logger.info("plain", vec![Attr::new("k", "v")]);
        assert_eq!(sink.last().unwrap().attrs, vec![Attr::new("k", "v")]);
    }

    #[test]
    fn test_all_levels() {
        let sink = MemoryHandler::new();
        let logger = Logger::new(Arc::new(sink.clone()));

        logger.trace("Trace", vec![]);
        logger.debug("Debug", vec![]);
        logger.info("Info", vec![]);
        logger.warn("Warn", vec![]);
        logger.error("Error", vec![]);
        logger.fatal("Fatal", vec![]);

        let levels: Vec<LogLevel> = sink.records().iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Trace,
                LogLevel::Debug,
                LogLevel::Info,
                LogLevel::Warn,
                LogLevel::Error,
                LogLevel::Fatal
            ]
        );
    }

    #[test]
    fn test_pipeline_formats_then_flattens() {
        let sink = MemoryHandler::new();
        let logger = Logger::builder()
            .formatter(format_by_key("email", |_| Value::from("***")))
            .flatten(FlattenOptions::new().with_prefix("attrs"))
            .sink(Arc::new(sink.clone()))
            .build()
            .unwrap();

        logger.info(
            "hello",
            vec![Attr::group("user", vec![Attr::new("email", "a@b.c")])],
        );

        assert_eq!(
            sink.last().unwrap().attrs,
            vec![Attr::new("attrs.user.email", "***")]
        );
    }

    #[test]
    fn test_empty_with_and_group_are_noops() {
        let sink = MemoryHandler::new();
        let logger = Logger::new(Arc::new(sink.clone())).with(vec![]).with_group("");

        logger.info("m", vec![Attr::new("k", 1)]);
        assert_eq!(sink.last().unwrap().attrs, vec![Attr::new("k", 1)]);
    }
}
