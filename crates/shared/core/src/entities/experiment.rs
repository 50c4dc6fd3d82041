//! Experiment identifiers
//!
//! An experiment is named `{agent_type}_{direction}_{horizon}_{slices}_{pov}`,
//! e.g. `QLEARNING_BUY_360_360_0.15`: a Q-learning agent buying 15% of the
//! day's historical volume over 360 minutes in 360 one-minute slices.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::direction::Direction;
use crate::error::ParseError;

/// Field delimiter in experiment identifiers
const DELIMITER: char = '_';

/// Number of fields in an experiment identifier
const FIELD_COUNT: usize = 5;

/// Training hyperparameters decoded from an experiment identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSpec {
    /// Raw experiment identifier
    pub id: String,
    /// Experimental agent family (e.g. `QLEARNING`)
    pub agent_type: String,
    /// Buy or sell the parent order
    pub direction: Direction,
    /// Execution horizon in minutes (H)
    pub horizon_minutes: u32,
    /// Number of slices across the horizon (T)
    pub slice_count: u32,
    /// Fraction of historical day volume to execute (POV)
    pub participation_rate: f64,
}

impl ExperimentSpec {
    /// Parse an experiment identifier
    pub fn parse(id: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = id.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount {
                id: id.to_string(),
                found: fields.len(),
            });
        }

        let agent_type = fields[0].trim();
        if agent_type.is_empty() {
            return Err(ParseError::EmptyAgentType(id.to_string()));
        }

        let direction: Direction = fields[1].parse()?;

        let horizon_minutes: u32 = fields[2].parse().map_err(|_| ParseError::InvalidField {
            field: "horizon_minutes",
            value: fields[2].to_string(),
        })?;

        let slice_count: u32 = fields[3].parse().map_err(|_| ParseError::InvalidField {
            field: "slice_count",
            value: fields[3].to_string(),
        })?;
        if slice_count == 0 {
            return Err(ParseError::ZeroSlices);
        }

        let participation_rate: f64 = fields[4].parse().map_err(|_| ParseError::InvalidField {
            field: "participation_rate",
            value: fields[4].to_string(),
        })?;
        if !(0.0..=1.0).contains(&participation_rate) {
            return Err(ParseError::ParticipationOutOfRange(participation_rate));
        }

        Ok(Self {
            id: id.to_string(),
            agent_type: agent_type.to_string(),
            direction,
            horizon_minutes,
            slice_count,
            participation_rate,
        })
    }
}

impl FromStr for ExperimentSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExperimentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_reference_experiment() {
        let spec = ExperimentSpec::parse("QLEARNING_BUY_360_360_0.15").unwrap();

        assert_eq!(spec.agent_type, "QLEARNING");
        assert_eq!(spec.direction, Direction::Buy);
        assert_eq!(spec.horizon_minutes, 360);
        assert_eq!(spec.slice_count, 360);
        assert_relative_eq!(spec.participation_rate, 0.15);
        assert_eq!(spec.to_string(), "QLEARNING_BUY_360_360_0.15");
    }

    #[test]
    fn test_wrong_field_count() {
        let err = ExperimentSpec::parse("QLEARNING_BUY_360_360").unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldCount {
                id: "QLEARNING_BUY_360_360".to_string(),
                found: 4
            }
        );

        let err = ExperimentSpec::parse("Q_LEARNING_BUY_360_360_0.15").unwrap_err();
        assert!(matches!(err, ParseError::FieldCount { found: 6, .. }));
    }

    #[test]
    fn test_non_numeric_fields() {
        let err = ExperimentSpec::parse("QLEARNING_BUY_six_360_0.15").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidField {
                field: "horizon_minutes",
                ..
            }
        ));

        let err = ExperimentSpec::parse("QLEARNING_BUY_360_360_lots").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidField {
                field: "participation_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_participation_bounds() {
        assert!(ExperimentSpec::parse("QLEARNING_SELL_60_10_0").is_ok());
        assert!(ExperimentSpec::parse("QLEARNING_SELL_60_10_1").is_ok());
        assert_eq!(
            ExperimentSpec::parse("QLEARNING_SELL_60_10_1.5").unwrap_err(),
            ParseError::ParticipationOutOfRange(1.5)
        );
    }

    #[test]
    fn test_zero_slices_rejected() {
        assert_eq!(
            ExperimentSpec::parse("QLEARNING_BUY_60_0_0.1").unwrap_err(),
            ParseError::ZeroSlices
        );
    }

    #[test]
    fn test_unknown_direction_rejected() {
        assert!(matches!(
            ExperimentSpec::parse("QLEARNING_HOLD_60_10_0.1").unwrap_err(),
            ParseError::UnknownDirection(_)
        ));
    }
}
