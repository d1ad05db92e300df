//! Handler trait for record destinations and decorators

use super::attr::Attr;
use super::error::Result;
use super::record::Record;
use std::sync::Arc;

/// Receives records; decorators wrap another handler
///
/// `with_attrs` and `with_group` return a new handler carrying the extra
/// attributes or the extra nesting level; the receiver is left unchanged.
pub trait Handler: Send + Sync {
    fn handle(&self, record: Record) -> Result<()>;
    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;
    fn name(&self) -> &str;
}
