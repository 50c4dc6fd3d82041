//! Replay Core Domain
//!
//! Pure domain types for training execution agents against replayed market days.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod learning;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AgentDescriptor, Direction, ExecutionAgent, ExperimentSpec, Schedule, SchedulePoint,
    TrainingDay,
};
pub use error::{ParseError, ShapeError};
pub use learning::{ValueTable, ValueTableConfig};
pub use values::{Quantity, Security, Timestamp, TradingDate, format_date, parse_date};
