//! Formatter metrics for observability
//!
//! Counters describing how much work the engine did and how often rules or
//! lazy value resolution failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for formatter observability
///
/// # Example
///
/// ```
/// use rust_log_formatter::core::FormatterMetrics;
///
/// let metrics = FormatterMetrics::new();
///
/// metrics.record_attr();
/// metrics.record_applied();
///
/// assert_eq!(metrics.attrs_processed(), 1);
/// assert_eq!(metrics.rules_applied(), 1);
/// ```
#[derive(Debug)]
pub struct FormatterMetrics {
    /// Top-level attributes run through the rule chain
    attrs_processed: AtomicU64,

    /// Rule invocations that produced a new value
    rules_applied: AtomicU64,

    /// Rule invocations that returned an error or panicked
    rule_failures: AtomicU64,

    /// Lazy values replaced by a placeholder
    resolve_failures: AtomicU64,
}

impl FormatterMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            attrs_processed: AtomicU64::new(0),
            rules_applied: AtomicU64::new(0),
            rule_failures: AtomicU64::new(0),
            resolve_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn attrs_processed(&self) -> u64 {
        self.attrs_processed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rules_applied(&self) -> u64 {
        self.rules_applied.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rule_failures(&self) -> u64 {
        self.rule_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn resolve_failures(&self) -> u64 {
        self.resolve_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_attr(&self) -> u64 {
        self.attrs_processed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_applied(&self) -> u64 {
        self.rules_applied.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rule_failure(&self) -> u64 {
        self.rule_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_resolve_failure(&self) -> u64 {
        self.resolve_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed rule invocations as a percentage of all invocations that did
    /// something (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.rule_failures() as f64;
        let total = self.rules_applied() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.attrs_processed.store(0, Ordering::Relaxed);
        self.rules_applied.store(0, Ordering::Relaxed);
        self.rule_failures.store(0, Ordering::Relaxed);
        self.resolve_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for FormatterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FormatterMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            attrs_processed: AtomicU64::new(self.attrs_processed()),
            rules_applied: AtomicU64::new(self.rules_applied()),
            rule_failures: AtomicU64::new(self.rule_failures()),
            resolve_failures: AtomicU64::new(self.resolve_failures()),
        }
    }
}
