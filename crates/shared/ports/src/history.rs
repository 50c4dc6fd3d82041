use replay_core::TradingDate;

use crate::error::DataResult;

/// Port for historical traded volume
///
/// Implementations must be safe to read from many experiments at once; the
/// store is never written during training.
pub trait VolumeHistory: Send + Sync {
    /// Per-minute traded volume for one security over one trading day
    fn minute_volumes(&self, security: &str, date: TradingDate) -> DataResult<Vec<f64>>;

    /// Whole-day traded volume
    fn total_volume(&self, security: &str, date: TradingDate) -> DataResult<f64> {
        Ok(self.minute_volumes(security, date)?.iter().sum())
    }
}
