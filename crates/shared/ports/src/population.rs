use replay_core::{AgentDescriptor, TradingDate};

use crate::error::DataResult;

/// Background agents for one replayed day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundPopulation {
    /// Agents in simulator id order
    pub agents: Vec<AgentDescriptor>,
    /// Number of ids consumed - the next free agent id
    pub agent_count: usize,
}

impl BackgroundPopulation {
    pub fn new(agents: Vec<AgentDescriptor>) -> Self {
        let agent_count = agents.len();
        Self {
            agents,
            agent_count,
        }
    }
}

/// Port for the background (market replay) agent generator
pub trait BackgroundAgentFactory: Send + Sync {
    /// Build the population replaying `security` on `date`
    fn build(&self, seed: u64, security: &str, date: TradingDate)
    -> DataResult<BackgroundPopulation>;
}
