use thiserror::Error;

/// Errors raised while decoding identifiers and dates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expected 5 '_'-separated fields in experiment id '{id}', found {found}")]
    FieldCount { id: String, found: usize },

    #[error("Empty agent type in experiment id '{0}'")]
    EmptyAgentType(String),

    #[error("Unknown direction: {0}")]
    UnknownDirection(String),

    #[error("Invalid {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("Participation rate {0} is outside [0, 1]")]
    ParticipationOutOfRange(f64),

    #[error("Slice count must be positive")]
    ZeroSlices,

    #[error("Invalid trading date: {0}")]
    InvalidDate(String),
}

/// Errors raised while constructing a value table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Value table needs at least one dimension")]
    NoDimensions,

    #[error("Value table dimension {0} has zero bins")]
    EmptyDimension(usize),

    #[error("Value table shape {0:?} is too large")]
    Overflow(Vec<usize>),
}
