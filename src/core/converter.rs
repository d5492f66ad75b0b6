//! Unit conversion: registry, engine and display formatting

pub mod registry;
pub mod engine;
pub mod format;

pub use engine::{convert, ConversionError};
pub use format::format_result;
