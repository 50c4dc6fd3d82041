//! Value Table
//!
//! Dense state/action value array plus the learning hyperparameters that are
//! annealed between episodes. The array is stored row-major; index `[i, j, ...]`
//! maps to `i * stride_0 + j * stride_1 + ...`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ShapeError;

/// Starting shape and hyperparameters for a fresh value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTableConfig {
    /// Bins per state/action dimension
    pub dims: Vec<usize>,
    /// Learning rate (alpha)
    pub learning_rate: f64,
    /// Multiplicative decay applied to alpha after each episode
    pub learning_rate_decay: f64,
    /// Alpha never decays below this
    pub learning_rate_floor: f64,
    /// Exploration rate (epsilon)
    pub exploration_rate: f64,
    /// Multiplicative decay applied to epsilon after each episode
    pub exploration_rate_decay: f64,
    /// Epsilon never decays below this
    pub exploration_rate_floor: f64,
    /// Discount factor (gamma) - used by the agent's update, never annealed
    pub discount_factor: f64,
}

impl Default for ValueTableConfig {
    fn default() -> Self {
        Self {
            dims: vec![100, 100, 20, 200, 5],
            learning_rate: 0.99,
            learning_rate_decay: 0.999,
            learning_rate_floor: 0.0,
            exploration_rate: 0.5,
            exploration_rate_decay: 0.999,
            exploration_rate_floor: 0.0,
            discount_factor: 0.90,
        }
    }
}

impl ValueTableConfig {
    /// Total number of cells for this shape
    pub fn cell_count(&self) -> Result<usize, ShapeError> {
        if self.dims.is_empty() {
            return Err(ShapeError::NoDimensions);
        }
        if let Some(axis) = self.dims.iter().position(|&d| d == 0) {
            return Err(ShapeError::EmptyDimension(axis));
        }
        self.dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| ShapeError::Overflow(self.dims.clone()))
    }
}

/// Learned values and their annealed hyperparameters
#[derive(Clone, PartialEq)]
pub struct ValueTable {
    dims: Vec<usize>,
    values: Vec<f64>,
    pub learning_rate: f64,
    pub learning_rate_decay: f64,
    pub learning_rate_floor: f64,
    pub exploration_rate: f64,
    pub exploration_rate_decay: f64,
    pub exploration_rate_floor: f64,
    pub discount_factor: f64,
}

impl ValueTable {
    /// Allocate a zeroed table
    pub fn new(config: &ValueTableConfig) -> Result<Self, ShapeError> {
        let cells = config.cell_count()?;
        Ok(Self {
            dims: config.dims.clone(),
            values: vec![0.0; cells],
            learning_rate: config.learning_rate,
            learning_rate_decay: config.learning_rate_decay,
            learning_rate_floor: config.learning_rate_floor,
            exploration_rate: config.exploration_rate,
            exploration_rate_decay: config.exploration_rate_decay,
            exploration_rate_floor: config.exploration_rate_floor,
            discount_factor: config.discount_factor,
        })
    }

    /// Shape of the value array
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw row-major values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable raw values - the simulator's agent writes updates here
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Fraction of cells holding a non-zero value (0.0 to 1.0)
    pub fn populated_fraction(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let populated = self.values.iter().filter(|v| **v != 0.0).count();
        populated as f64 / self.values.len() as f64
    }
}

// Values are elided - real tables hold hundreds of millions of cells
impl fmt::Debug for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTable")
            .field("dims", &self.dims)
            .field("learning_rate", &self.learning_rate)
            .field("exploration_rate", &self.exploration_rate)
            .field("discount_factor", &self.discount_factor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small() -> ValueTableConfig {
        ValueTableConfig {
            dims: vec![2, 3, 4],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_shape_matches_reference() {
        let config = ValueTableConfig::default();
        assert_eq!(config.dims, vec![100, 100, 20, 200, 5]);
        assert_eq!(config.cell_count().unwrap(), 100 * 100 * 20 * 200 * 5);
    }

    #[test]
    fn test_new_table_is_zeroed() {
        let table = ValueTable::new(&small()).unwrap();
        assert_eq!(table.len(), 24);
        assert!(table.values().iter().all(|v| *v == 0.0));
        assert_relative_eq!(table.learning_rate, 0.99);
        assert_relative_eq!(table.exploration_rate, 0.5);
    }

    #[test]
    fn test_populated_fraction() {
        let mut table = ValueTable::new(&small()).unwrap();
        assert_relative_eq!(table.populated_fraction(), 0.0);

        table.values_mut()[17] = 0.5;
        table.values_mut()[11] = -1.0;

        assert_relative_eq!(table.populated_fraction(), 2.0 / 24.0);

        table.values_mut().fill(1.0);
        assert_relative_eq!(table.populated_fraction(), 1.0);
    }

    #[test]
    fn test_invalid_shapes() {
        let empty = ValueTableConfig {
            dims: vec![],
            ..Default::default()
        };
        assert_eq!(ValueTable::new(&empty).unwrap_err(), ShapeError::NoDimensions);

        let zero = ValueTableConfig {
            dims: vec![3, 0],
            ..Default::default()
        };
        assert_eq!(
            ValueTable::new(&zero).unwrap_err(),
            ShapeError::EmptyDimension(1)
        );

        let huge = ValueTableConfig {
            dims: vec![usize::MAX, 2],
            ..Default::default()
        };
        assert!(matches!(huge.cell_count(), Err(ShapeError::Overflow(_))));
    }
}
