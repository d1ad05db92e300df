//! In-memory capturing handler

use crate::core::{Attr, Handler, Record, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Scope {
    name: Option<String>,
    attrs: Vec<Attr>,
}

/// Handler that keeps every record in memory
///
/// Attributes attached after `with_group` are nested under that group, and
/// groups that end up empty are omitted. Handlers derived through
/// `with_attrs`/`with_group` share the same record store, so a clone kept by
/// the caller sees everything logged downstream.
#[derive(Debug, Clone)]
pub struct MemoryHandler {
    records: Arc<Mutex<Vec<Record>>>,
    scopes: Vec<Scope>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            scopes: vec![Scope {
                name: None,
                attrs: Vec::new(),
            }],
        }
    }

    /// Snapshot of the captured records
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn last(&self) -> Option<Record> {
        self.records.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn nest(&self, attrs: Vec<Attr>) -> Vec<Attr> {
        let mut inner = attrs;
        for scope in self.scopes.iter().rev() {
            let mut merged = scope.attrs.clone();
            merged.extend(inner);
            inner = match &scope.name {
                Some(_) if merged.is_empty() => Vec::new(),
                Some(name) => vec![Attr::group(name.clone(), merged)],
                None => merged,
            };
        }
        inner
    }
}

impl Default for MemoryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for MemoryHandler {
    fn handle(&self, record: Record) -> Result<()> {
        let attrs = self.nest(record.attrs.clone());
        self.records.lock().push(record.with_replaced_attrs(attrs));
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut handler = self.clone();
        if let Some(scope) = handler.scopes.last_mut() {
            scope.attrs.extend(attrs);
        }
        Arc::new(handler)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut handler = self.clone();
        handler.scopes.push(Scope {
            name: Some(name.to_string()),
            attrs: Vec::new(),
        });
        Arc::new(handler)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
