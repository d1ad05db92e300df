//! Flattening of nested attribute groups
//!
//! Collapses a tree of attributes into a single level. In path-preserving
//! mode every enclosing group contributes `key + separator` to the key of its
//! descendants:
//!
//! ```
//! use rust_log_formatter::prelude::*;
//!
//! let attrs = vec![
//!     Attr::new("a", 1),
//!     Attr::group("g", vec![Attr::new("b", 2)]),
//! ];
//! let flat = flatten_attrs_with_prefix(".", "attrs", &attrs);
//!
//! let keys: Vec<&str> = flat.iter().map(|a| a.key.as_str()).collect();
//! assert_eq!(keys, vec!["attrs.a", "attrs.g.b"]);
//! ```

use super::attr::Attr;
use super::engine::DEFAULT_RESOLVE_PLACEHOLDER;
use super::error::{stderr_error_handler, ErrorHandler};
use super::value::{Value, DEFAULT_MAX_RESOLVE_DEPTH};
use serde::{Deserialize, Serialize};

/// Default separator between key segments
pub const DEFAULT_SEPARATOR: &str = ".";

/// Flatten configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenOptions {
    /// Drop the group path: nested keys are emitted bare and may collide
    pub ignore_path: bool,
    /// Separator between key segments; empty means [`DEFAULT_SEPARATOR`]
    pub separator: String,
    /// Prefix for every emitted key; ignored when empty
    pub prefix: String,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            ignore_path: false,
            separator: DEFAULT_SEPARATOR.to_string(),
            prefix: String::new(),
        }
    }
}

impl FlattenOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ignore_path(mut self, ignore_path: bool) -> Self {
        self.ignore_path = ignore_path;
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn normalized(mut self) -> Self {
        if self.separator.is_empty() {
            self.separator = DEFAULT_SEPARATOR.to_string();
        }
        self
    }

    /// Join a prefix and a key with the separator, skipping an empty prefix
    pub fn join(&self, prefix: &str, key: &str) -> String {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}{}", prefix, self.separator, key)
        }
    }
}

/// Rewrites attribute trees into flat attribute lists
pub struct Flattener {
    options: FlattenOptions,
    max_resolve_depth: usize,
    on_error: ErrorHandler,
}

impl Flattener {
    pub fn new(options: FlattenOptions) -> Self {
        Self {
            options: options.normalized(),
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
            on_error: stderr_error_handler(),
        }
    }

    #[must_use]
    pub fn with_max_resolve_depth(mut self, depth: usize) -> Self {
        self.max_resolve_depth = depth;
        self
    }

    #[must_use]
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = handler;
        self
    }

    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    pub fn flatten(&self, attrs: &[Attr]) -> Vec<Attr> {
        let mut output = Vec::with_capacity(attrs.len());
        if self.options.ignore_path {
            self.flatten_bare(attrs, &mut output);
        } else {
            self.flatten_prefixed(&self.options.prefix, attrs, &mut output);
        }
        output
    }

    fn resolve(&self, value: &Value) -> Value {
        match value.clone().resolve(self.max_resolve_depth) {
            Ok(value) => value,
            Err(err) => {
                (self.on_error)(&err);
                Value::string(DEFAULT_RESOLVE_PLACEHOLDER)
            }
        }
    }

    fn flatten_bare(&self, attrs: &[Attr], output: &mut Vec<Attr>) {
        for attr in attrs {
            match self.resolve(&attr.value) {
                Value::Group(children) => self.flatten_bare(&children, output),
                value => output.push(attr.with_value(value)),
            }
        }
    }

    fn flatten_prefixed(&self, prefix: &str, attrs: &[Attr], output: &mut Vec<Attr>) {
        for attr in attrs {
            let key = self.options.join(prefix, &attr.key);
            match self.resolve(&attr.value) {
                Value::Group(children) => self.flatten_prefixed(&key, &children, output),
                value => output.push(Attr { key, value }),
            }
        }
    }
}

/// Flatten recursively, dropping the group path
pub fn flatten_attrs(attrs: &[Attr]) -> Vec<Attr> {
    Flattener::new(FlattenOptions::new().with_ignore_path(true)).flatten(attrs)
}

/// Flatten recursively, joining the group path and `prefix` with `separator`
pub fn flatten_attrs_with_prefix(separator: &str, prefix: &str, attrs: &[Attr]) -> Vec<Attr> {
    Flattener::new(
        FlattenOptions::new()
            .with_separator(separator)
            .with_prefix(prefix),
    )
    .flatten(attrs)
}

/// Prepend `prefix` verbatim to every key
pub fn prefix_attr_keys(prefix: &str, attrs: &[Attr]) -> Vec<Attr> {
    attrs
        .iter()
        .map(|attr| Attr {
            key: format!("{}{}", prefix, attr.key),
            value: attr.value.clone(),
        })
        .collect()
}
