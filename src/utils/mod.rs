//! Small helpers shared across layers.

pub mod identifiers;
pub mod log_sanitizer;
pub mod time;

pub use identifiers::*;
pub use time::*;
