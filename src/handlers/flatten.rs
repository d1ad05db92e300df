//! Handler flattening attribute trees before forwarding records

use crate::core::{
    stderr_error_handler, Attr, ErrorHandler, FlattenOptions, Flattener, Handler, Record, Result,
};
use std::sync::Arc;

/// Middleware collapsing nested groups into a single attribute level
///
/// `with_group` does not open a group downstream. In path-preserving mode it
/// extends the key prefix instead; with `ignore_path` it is a no-op.
#[derive(Clone)]
pub struct FlattenHandler {
    options: FlattenOptions,
    on_error: ErrorHandler,
    next: Arc<dyn Handler>,
}

impl FlattenHandler {
    pub fn new(options: FlattenOptions, next: Arc<dyn Handler>) -> Self {
        Self {
            options,
            on_error: stderr_error_handler(),
            next,
        }
    }

    #[must_use]
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = handler;
        self
    }

    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    fn flatten(&self, attrs: &[Attr]) -> Vec<Attr> {
        Flattener::new(self.options.clone())
            .on_error(Arc::clone(&self.on_error))
            .flatten(attrs)
    }
}

impl Handler for FlattenHandler {
    fn handle(&self, record: Record) -> Result<()> {
        let attrs = self.flatten(&record.attrs);
        self.next.handle(record.with_replaced_attrs(attrs))
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(Self {
            options: self.options.clone(),
            on_error: Arc::clone(&self.on_error),
            next: self.next.with_attrs(self.flatten(&attrs)),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut options = self.options.clone();
        if !options.ignore_path {
            options.prefix = options.join(&options.prefix, name);
        }
        Arc::new(Self {
            options,
            on_error: Arc::clone(&self.on_error),
            next: Arc::clone(&self.next),
        })
    }

    fn name(&self) -> &str {
        "flatten"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use crate::handlers::MemoryHandler;

    fn record(attrs: Vec<Attr>) -> Record {
        Record::new(LogLevel::Info, "m").with_attrs(attrs)
    }

    #[test]
    fn test_groups_become_prefixes() {
        let sink = MemoryHandler::new();
        let handler = FlattenHandler::new(
            FlattenOptions::new().with_separator("_"),
            Arc::new(sink.clone()),
        );

        handler
            .with_group("http")
            .with_attrs(vec![Attr::new("method", "GET")])
            .handle(record(vec![Attr::group("req", vec![Attr::new("path", "/")])]))
            .unwrap();

        assert_eq!(
            sink.last().unwrap().attrs,
            vec![Attr::new("http_method", "GET"), Attr::new("http_req_path", "/")]
        );
    }

    #[test]
    fn test_ignore_path_drops_groups() {
        let sink = MemoryHandler::new();
        let handler = FlattenHandler::new(
            FlattenOptions::new().with_ignore_path(true),
            Arc::new(sink.clone()),
        );

        handler
            .with_group("outer")
            .handle(record(vec![Attr::group("user", vec![Attr::new("id", 1)])]))
            .unwrap();

        assert_eq!(sink.last().unwrap().attrs, vec![Attr::new("id", 1)]);
    }
}
