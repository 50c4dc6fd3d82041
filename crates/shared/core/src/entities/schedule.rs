//! Execution Schedule
//!
//! A flat schedule: every wakeup across the horizon trades the same child quantity.

use chrono::Duration;

use crate::values::{Quantity, Timestamp};

/// A single wakeup in a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePoint {
    /// Wall clock time of the wakeup
    pub at: Timestamp,
    /// Child order quantity to trade at this wakeup
    pub quantity: Quantity,
}

/// Time-indexed child order quantities for one parent order
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// Total order size over the full horizon
    pub parent_quantity: Quantity,
    /// Quantity traded at every wakeup
    pub child_quantity: Quantity,
    /// Spacing between consecutive wakeups
    pub slice_duration: Duration,
    /// Ordered wakeups, both window endpoints included
    pub points: Vec<SchedulePoint>,
}

impl Schedule {
    /// Number of wakeups
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if schedule is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First wakeup
    pub fn start_time(&self) -> Option<Timestamp> {
        self.points.first().map(|p| p.at)
    }

    /// Last wakeup - the simulation stop time
    pub fn end_time(&self) -> Option<Timestamp> {
        self.points.last().map(|p| p.at)
    }
}
