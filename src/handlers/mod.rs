//! Handler implementations

pub mod flatten;
pub mod formatter;
pub mod memory;

pub use flatten::FlattenHandler;
pub use formatter::FormatterHandler;
pub use memory::MemoryHandler;
