use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{Security, TradingDate, format_date};

/// One replayed (security, date) pair - consumed by exactly one episode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingDay {
    pub security: Security,
    pub date: TradingDate,
}

impl TrainingDay {
    pub fn new(security: impl Into<Security>, date: TradingDate) -> Self {
        Self {
            security: security.into(),
            date,
        }
    }

    /// Date in the compact `YYYYMMDD` form used for file and run names
    pub fn date_tag(&self) -> String {
        format_date(self.date)
    }
}

impl fmt::Display for TrainingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.security, self.date_tag())
    }
}
