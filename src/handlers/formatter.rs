//! Handler applying formatter rules before forwarding records

use crate::core::{Attr, Formatter, FormatterEngine, Handler, Record, Result};
use std::sync::Arc;

/// Middleware running a [`FormatterEngine`] over every attribute
///
/// Attributes attached through `with_attrs` are transformed once, when they
/// are attached, with the groups opened so far as their path. Record
/// attributes are transformed on each `handle` call.
#[derive(Clone)]
pub struct FormatterHandler {
    engine: Arc<FormatterEngine>,
    groups: Vec<String>,
    next: Arc<dyn Handler>,
}

impl FormatterHandler {
    pub fn new(engine: Arc<FormatterEngine>, next: Arc<dyn Handler>) -> Self {
        Self {
            engine,
            groups: Vec::new(),
            next,
        }
    }

    /// Engine with the default configuration over `formatters`
    pub fn from_formatters(formatters: Vec<Formatter>, next: Arc<dyn Handler>) -> Self {
        Self::new(Arc::new(FormatterEngine::new(formatters)), next)
    }

    pub fn engine(&self) -> &FormatterEngine {
        &self.engine
    }

    /// Groups opened on this handler, outermost first
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

impl Handler for FormatterHandler {
    fn handle(&self, record: Record) -> Result<()> {
        let attrs = self.engine.transform_attrs(&self.groups, &record.attrs);
        self.next.handle(record.with_replaced_attrs(attrs))
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let attrs = self.engine.transform_attrs(&self.groups, &attrs);
        Arc::new(Self {
            engine: Arc::clone(&self.engine),
            groups: self.groups.clone(),
            next: self.next.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut groups = self.groups.clone();
        groups.push(name.to_string());
        Arc::new(Self {
            engine: Arc::clone(&self.engine),
            groups,
            next: self.next.with_group(name),
        })
    }

    fn name(&self) -> &str {
        "formatter"
    }
}
