//! Execution Schedules
//!
//! Turns a participation target into a flat child-order schedule:
//!
//! ```text
//! parent = round(POV × day volume)
//! child  = round(parent / T)
//!
//! 10:00        10:00 + H/T                     10:00 + H
//!   ├──────────────┼──────── ... ───────────────┤
//! child          child                        child      (T + 1 wakeups)
//! ```
//!
//! Rounding is half-to-even throughout. If the child quantity rounds to zero
//! the parent is raised to `T` so every wakeup trades one unit.
//!
//! # Example
//!
//! ```rust
//! use replay_execution::flat_schedule;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2019, 6, 21)
//!     .unwrap()
//!     .and_hms_opt(10, 0, 0)
//!     .unwrap();
//! let schedule = flat_schedule(1_000_000.0, start, 360, 360, 0.15).unwrap();
//!
//! assert_eq!(schedule.parent_quantity, 150_000);
//! assert_eq!(schedule.child_quantity, 417);
//! assert_eq!(schedule.len(), 361);
//! ```

mod builder;
mod error;

pub use builder::{ScheduleBuilder, default_session_open, flat_schedule};
pub use error::{Result, ScheduleError};
