use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use replay_core::{AgentDescriptor, TradingDate, format_date};
use replay_ports::{BackgroundAgentFactory, BackgroundPopulation, DataResult};

/// Market replay background: one exchange agent plus one agent replaying
/// the day's historical order flow
#[derive(Debug, Clone, Default)]
pub struct MarketReplayPopulation;

impl BackgroundAgentFactory for MarketReplayPopulation {
    fn build(
        &self,
        seed: u64,
        security: &str,
        date: TradingDate,
    ) -> DataResult<BackgroundPopulation> {
        let mut rng = StdRng::seed_from_u64(seed);

        let agents = vec![
            AgentDescriptor {
                id: 0,
                name: "EXCHANGE_AGENT".to_string(),
                kind: "ExchangeAgent".to_string(),
                seed: u64::from(rng.r#gen::<u32>()),
            },
            AgentDescriptor {
                id: 1,
                name: format!("MARKET_REPLAY_AGENT_{}_{}", security, format_date(date)),
                kind: "MarketReplayAgent".to_string(),
                seed: u64::from(rng.r#gen::<u32>()),
            },
        ];

        Ok(BackgroundPopulation::new(agents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_population_shape() {
        let date = NaiveDate::from_ymd_opt(2019, 6, 3).unwrap();
        let population = MarketReplayPopulation.build(28, "IBM", date).unwrap();

        assert_eq!(population.agent_count, 2);
        assert_eq!(population.agents[0].kind, "ExchangeAgent");
        assert_eq!(population.agents[1].name, "MARKET_REPLAY_AGENT_IBM_20190603");
        assert_eq!(
            population.agents.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_population_is_seeded() {
        let date = NaiveDate::from_ymd_opt(2019, 6, 3).unwrap();
        let first = MarketReplayPopulation.build(28, "IBM", date).unwrap();
        let second = MarketReplayPopulation.build(28, "IBM", date).unwrap();
        let other = MarketReplayPopulation.build(29, "IBM", date).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }
}
