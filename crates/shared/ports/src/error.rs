use thiserror::Error;

/// Errors raised by the historical data store and population generator
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No historical data for {security} on {date}")]
    NotFound { security: String, date: String },

    #[error("Failed to read historical data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed historical data: {0}")]
    Parse(String),
}

pub type DataResult<T> = std::result::Result<T, DataError>;

/// Errors raised by the market simulator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("Simulation '{run}' failed: {reason}")]
    Failed { run: String, reason: String },

    #[error("Simulation '{run}' broke its result contract: {reason}")]
    ContractViolation { run: String, reason: String },
}

pub type SimulatorResult<T> = std::result::Result<T, SimulatorError>;
