use async_trait::async_trait;
use replay_ports::{
    AgentState, MarketSimulator, SimulationOutput, SimulationRequest, SimulatorError,
    SimulatorResult,
};

/// Simulator stand-in that runs no order book
///
/// Validates the request and hands every agent's state straight back, the
/// execution agent's value table last and unchanged. Exercises schedules,
/// annealing and checkpointing end to end without the external engine.
#[derive(Debug, Clone, Default)]
pub struct DryRunSimulator;

#[async_trait]
impl MarketSimulator for DryRunSimulator {
    async fn run(&self, request: SimulationRequest) -> SimulatorResult<SimulationOutput> {
        let SimulationRequest {
            name,
            background,
            agent,
            stop_time,
            ..
        } = request;

        if let Some(start) = agent.schedule.start_time() {
            if stop_time < start {
                return Err(SimulatorError::Failed {
                    run: name,
                    reason: format!("stop time {} precedes first wakeup {}", stop_time, start),
                });
            }
        }

        log::debug!(
            "[DryRun] {}: {} background agents, {} wakeups of {} until {}",
            name,
            background.len(),
            agent.schedule.len(),
            agent.schedule.child_quantity,
            stop_time
        );

        let mut states: Vec<AgentState> = background
            .iter()
            .map(|a| AgentState::Background { agent_id: a.id })
            .collect();
        states.push(AgentState::ValueTable {
            agent_id: agent.id,
            table: agent.value_table,
        });

        Ok(SimulationOutput { states })
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
