use async_trait::async_trait;
use replay_core::{AgentDescriptor, ExecutionAgent, Timestamp, TradingDate, ValueTable};

use crate::error::SimulatorResult;

/// Everything the simulator needs for one run
///
/// The execution agent, and with it the value table, is moved into the
/// request. The simulator owns it until it hands it back in the output.
#[derive(Debug)]
pub struct SimulationRequest {
    /// Run name (also used by the simulator for its own logs)
    pub name: String,
    /// Background population in id order
    pub background: Vec<AgentDescriptor>,
    /// The learning agent, always last in id order
    pub agent: ExecutionAgent,
    /// Replayed trading day
    pub date: TradingDate,
    /// Simulation stops at this time
    pub stop_time: Timestamp,
}

impl SimulationRequest {
    /// Total number of agents in the run
    pub fn agent_count(&self) -> usize {
        self.background.len() + 1
    }
}

/// Saved state of one agent at the end of a run
#[derive(Debug)]
pub enum AgentState {
    /// Background agents save nothing the trainer needs
    Background { agent_id: usize },
    /// The learning agent's value table after the run
    ValueTable {
        agent_id: usize,
        table: ValueTable,
    },
}

impl AgentState {
    pub fn agent_id(&self) -> usize {
        match self {
            AgentState::Background { agent_id } => *agent_id,
            AgentState::ValueTable { agent_id, .. } => *agent_id,
        }
    }
}

/// Saved agent states in agent id order - the learning agent's is last
#[derive(Debug, Default)]
pub struct SimulationOutput {
    pub states: Vec<AgentState>,
}

/// Port for the market simulator
#[async_trait]
pub trait MarketSimulator: Send + Sync {
    /// Run one simulation to `stop_time` and return every agent's saved state
    async fn run(&self, request: SimulationRequest) -> SimulatorResult<SimulationOutput>;

    /// Simulator name for logging
    fn name(&self) -> &str {
        "MarketSimulator"
    }
}
