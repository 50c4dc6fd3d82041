//! Annealing - decay of the learning hyperparameters between episodes
//!
//! ```text
//! alpha'   = max(alpha × alpha_decay, alpha_floor)
//! epsilon' = max(epsilon × epsilon_decay, epsilon_floor)
//! ```

use replay_core::ValueTable;

/// Hyperparameters after one annealing step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealedRates {
    pub learning_rate: f64,
    pub exploration_rate: f64,
}

/// Decay learning and exploration rates in place, once per completed episode
pub fn anneal(table: &mut ValueTable) -> AnnealedRates {
    table.learning_rate = decay(
        table.learning_rate,
        table.learning_rate_decay,
        table.learning_rate_floor,
    );
    table.exploration_rate = decay(
        table.exploration_rate,
        table.exploration_rate_decay,
        table.exploration_rate_floor,
    );

    AnnealedRates {
        learning_rate: table.learning_rate,
        exploration_rate: table.exploration_rate,
    }
}

fn decay(value: f64, rate: f64, floor: f64) -> f64 {
    (value * rate).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use replay_core::ValueTableConfig;

    fn table(config: ValueTableConfig) -> ValueTable {
        ValueTable::new(&ValueTableConfig {
            dims: vec![2, 2],
            ..config
        })
        .unwrap()
    }

    #[test]
    fn test_single_step() {
        let mut table = table(ValueTableConfig::default());
        let rates = anneal(&mut table);

        assert_relative_eq!(rates.learning_rate, 0.99 * 0.999);
        assert_relative_eq!(rates.exploration_rate, 0.5 * 0.999);
        assert_relative_eq!(table.learning_rate, rates.learning_rate);
    }

    #[test]
    fn test_floors_hold() {
        let mut table = table(ValueTableConfig {
            learning_rate: 0.5,
            learning_rate_decay: 0.5,
            learning_rate_floor: 0.1,
            exploration_rate: 0.3,
            exploration_rate_decay: 0.9,
            exploration_rate_floor: 0.25,
            ..Default::default()
        });

        for _ in 0..10 {
            anneal(&mut table);
        }

        assert_relative_eq!(table.learning_rate, 0.1);
        assert_relative_eq!(table.exploration_rate, 0.25);
    }

    #[test]
    fn test_monotone_and_bounded() {
        let mut table = table(ValueTableConfig {
            learning_rate_floor: 0.4,
            exploration_rate_floor: 0.05,
            learning_rate_decay: 0.97,
            exploration_rate_decay: 0.9,
            ..Default::default()
        });

        for _ in 0..500 {
            let (alpha, epsilon) = (table.learning_rate, table.exploration_rate);
            anneal(&mut table);

            assert!(table.learning_rate <= alpha);
            assert!(table.learning_rate >= table.learning_rate_floor);
            assert!(table.exploration_rate <= epsilon);
            assert!(table.exploration_rate >= table.exploration_rate_floor);
        }
    }

    #[test]
    fn test_values_untouched() {
        let mut table = table(ValueTableConfig::default());
        table.values_mut()[3] = 3.5;
        let before = table.values().to_vec();

        anneal(&mut table);

        assert_eq!(table.values(), before.as_slice());
        assert_relative_eq!(table.discount_factor, 0.9);
    }
}
