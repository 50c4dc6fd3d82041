//! Schedule errors

use replay_ports::DataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Historical volume unavailable for {security} on {date}: {source}")]
    DataUnavailable {
        security: String,
        date: String,
        #[source]
        source: DataError,
    },

    #[error("Invalid schedule input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
