//! Training errors
//!
//! Every error is local to one experiment. `Persist` is reported but never
//! aborts training; everything else stops the owning experiment.

use replay_core::{ParseError, ShapeError};
use replay_execution::ScheduleError;
use replay_ports::{DataError, SimulatorError};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed experiment id: {0}")]
    MalformedExperimentId(#[from] ParseError),

    #[error("Historical data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Simulator failure: {0}")]
    SimulatorFailure(#[from] SimulatorError),

    #[error("Failed to persist checkpoint {path:?}: {reason}")]
    Persist { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Worker for experiment {0} stopped without reporting")]
    WorkerPanicked(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ScheduleError> for Error {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::DataUnavailable { .. } => Error::DataUnavailable(err.to_string()),
            ScheduleError::InvalidInput(msg) => Error::InvalidInput(msg),
        }
    }
}

impl From<DataError> for Error {
    fn from(err: DataError) -> Self {
        Error::DataUnavailable(err.to_string())
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Error::InvalidInput(err.to_string())
    }
}
