//! Schedule parsing and timezone-aware availability for food-distribution locations.

pub mod calculator;
pub mod error;
pub mod format;
pub mod parser;
pub mod types;

pub use calculator::*;
pub use error::ScheduleError;
pub use format::*;
pub use parser::*;
pub use types::*;
