//! Volume-participation schedule builder
//!
//! Strategy: size the parent from the day's historical volume, then trade it
//! evenly over time (flat, not volume-weighted).
//!
//! q(t) = round(POV × V / T)

use chrono::{Duration, NaiveTime};
use replay_core::{Quantity, Schedule, SchedulePoint, Timestamp, TradingDate, format_date};
use replay_ports::VolumeHistory;
use std::sync::Arc;

use crate::error::{Result, ScheduleError};

/// Trading window opens at 10:00:00 exchange time
pub fn default_session_open() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()
}

const NANOS_PER_MINUTE: i64 = 60 * 1_000_000_000;

/// Builds schedules from the historical volume store
#[derive(Clone)]
pub struct ScheduleBuilder {
    history: Arc<dyn VolumeHistory>,
    session_open: NaiveTime,
}

impl ScheduleBuilder {
    pub fn new(history: Arc<dyn VolumeHistory>) -> Self {
        Self::with_session_open(history, default_session_open())
    }

    /// Create with a custom window start time
    pub fn with_session_open(history: Arc<dyn VolumeHistory>, session_open: NaiveTime) -> Self {
        Self {
            history,
            session_open,
        }
    }

    /// Build the schedule for one (security, date) pair
    pub fn build(
        &self,
        security: &str,
        date: TradingDate,
        horizon_minutes: u32,
        slice_count: u32,
        participation_rate: f64,
    ) -> Result<Schedule> {
        let day_volume = self
            .history
            .total_volume(security, date)
            .map_err(|source| ScheduleError::DataUnavailable {
                security: security.to_string(),
                date: format_date(date),
                source,
            })?;

        let start = date.and_time(self.session_open);
        let schedule = flat_schedule(
            day_volume,
            start,
            horizon_minutes,
            slice_count,
            participation_rate,
        )?;

        log::debug!(
            "{} {}: parent quantity {}, child quantity {}",
            security,
            format_date(date),
            schedule.parent_quantity,
            schedule.child_quantity
        );

        Ok(schedule)
    }
}

/// Compute a flat schedule from a known day volume
///
/// Produces `slice_count + 1` wakeups from `start` to `start + horizon`, both
/// inclusive, each trading the same child quantity.
pub fn flat_schedule(
    day_volume: f64,
    start: Timestamp,
    horizon_minutes: u32,
    slice_count: u32,
    participation_rate: f64,
) -> Result<Schedule> {
    if slice_count == 0 {
        return Err(ScheduleError::InvalidInput(
            "slice count must be positive".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&participation_rate) {
        return Err(ScheduleError::InvalidInput(format!(
            "participation rate {} is outside [0, 1]",
            participation_rate
        )));
    }
    if !day_volume.is_finite() || day_volume < 0.0 {
        return Err(ScheduleError::InvalidInput(format!(
            "day volume {} is not a non-negative number",
            day_volume
        )));
    }

    let mut parent_quantity = round_quantity(participation_rate * day_volume);
    let mut child_quantity = round_quantity(parent_quantity as f64 / slice_count as f64);
    if child_quantity == 0 {
        // Every slice trades at least one unit
        parent_quantity = Quantity::from(slice_count);
        child_quantity = round_quantity(parent_quantity as f64 / slice_count as f64);
    }

    let slices = i64::from(slice_count);
    let horizon_nanos = i64::from(horizon_minutes)
        .checked_mul(NANOS_PER_MINUTE)
        .ok_or_else(|| horizon_out_of_range(start, horizon_minutes))?;

    // Offsets are computed from the horizon so the last wakeup lands exactly on the end
    let points = (0..=slices)
        .map(|i| {
            start
                .checked_add_signed(Duration::nanoseconds(offset_nanos(horizon_nanos, i, slices)))
                .map(|at| SchedulePoint {
                    at,
                    quantity: child_quantity,
                })
                .ok_or_else(|| horizon_out_of_range(start, horizon_minutes))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Schedule {
        parent_quantity,
        child_quantity,
        slice_duration: Duration::nanoseconds(horizon_nanos / slices),
        points,
    })
}

fn horizon_out_of_range(start: Timestamp, horizon_minutes: u32) -> ScheduleError {
    ScheduleError::InvalidInput(format!(
        "horizon of {} minutes from {} is out of range",
        horizon_minutes, start
    ))
}

/// `horizon × i / slices` without intermediate overflow
fn offset_nanos(horizon_nanos: i64, i: i64, slices: i64) -> i64 {
    (i128::from(horizon_nanos) * i128::from(i) / i128::from(slices)) as i64
}

/// Round half to even and clamp to a share count
fn round_quantity(value: f64) -> Quantity {
    value.round_ties_even().max(0.0) as Quantity
}
