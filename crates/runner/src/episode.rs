//! Episode - one simulation run over one replayed day
//!
//! The value table is moved into the execution agent, the agent into the
//! simulator request, and the table comes back in the simulator's output.
//! The training loop cannot touch it while the run is in flight.

use replay_core::{ExecutionAgent, ExperimentSpec, Schedule, TrainingDay, ValueTable};
use replay_ports::{
    AgentState, BackgroundAgentFactory, MarketSimulator, SimulationOutput, SimulationRequest,
    SimulatorError,
};
use std::sync::Arc;

use crate::blocking::run_blocking;
use crate::error::{Error, Result};

/// Inputs for one episode
#[derive(Debug)]
pub struct Episode<'a> {
    /// Experiment being trained
    pub experiment: &'a ExperimentSpec,
    /// Replayed (security, date)
    pub day: &'a TrainingDay,
    /// 1-based episode number
    pub index: usize,
    /// Schedule built for this day
    pub schedule: Schedule,
    /// Seed for the execution agent's own randomness
    pub agent_seed: u64,
}

/// Simulator run name for an episode
pub fn run_name(experiment: &str, index: usize, day: &TrainingDay) -> String {
    format!(
        "MR_{}_EPISODE_{}_{}_{}",
        experiment,
        index,
        day.security,
        day.date_tag()
    )
}

/// Assembles agents and drives the simulator for single episodes
#[derive(Clone)]
pub struct EpisodeRunner {
    simulator: Arc<dyn MarketSimulator>,
    population: Arc<dyn BackgroundAgentFactory>,
    population_seed: u64,
}

impl EpisodeRunner {
    pub fn new(
        simulator: Arc<dyn MarketSimulator>,
        population: Arc<dyn BackgroundAgentFactory>,
        population_seed: u64,
    ) -> Self {
        Self {
            simulator,
            population,
            population_seed,
        }
    }

    /// Run one episode and return the updated value table
    pub async fn run(&self, episode: Episode<'_>, table: ValueTable) -> Result<ValueTable> {
        let Episode {
            experiment,
            day,
            index,
            schedule,
            agent_seed,
        } = episode;

        let stop_time = schedule
            .end_time()
            .ok_or_else(|| Error::InvalidInput("episode schedule has no wakeups".to_string()))?;

        let factory = self.population.clone();
        let (seed, security, date) = (self.population_seed, day.security.clone(), day.date);
        let population =
            run_blocking(&experiment.id, move || factory.build(seed, &security, date)).await??;

        let agent = ExecutionAgent {
            id: population.agent_count,
            name: experiment.id.clone(),
            security: day.security.clone(),
            direction: experiment.direction,
            quantity: schedule.parent_quantity,
            schedule,
            value_table: table,
            seed: agent_seed,
        };
        let agent_id = agent.id;

        let request = SimulationRequest {
            name: run_name(&experiment.id, index, day),
            background: population.agents,
            agent,
            date: day.date,
            stop_time,
        };

        log::info!("Number of Agents: {}", request.agent_count());
        log::info!("Number of Background Agents: {}", request.background.len());
        log::info!("Experimental Agent Type: {}", experiment.agent_type);

        let run = request.name.clone();
        log::debug!("Starting {} on {}", run, self.simulator.name());
        let output = self.simulator.run(request).await?;

        Ok(take_value_table(&run, agent_id, output)?)
    }
}

/// Pull the execution agent's table out of the last saved state
pub fn take_value_table(
    run: &str,
    agent_id: usize,
    mut output: SimulationOutput,
) -> std::result::Result<ValueTable, SimulatorError> {
    let violation = |reason: String| SimulatorError::ContractViolation {
        run: run.to_string(),
        reason,
    };

    match output.states.pop() {
        Some(AgentState::ValueTable {
            agent_id: owner,
            table,
        }) if owner == agent_id => Ok(table),
        Some(AgentState::ValueTable { agent_id: owner, .. }) => Err(violation(format!(
            "last value table belongs to agent {}, expected agent {}",
            owner, agent_id
        ))),
        Some(AgentState::Background { agent_id: owner }) => Err(violation(format!(
            "last saved state is background agent {}, expected a value table",
            owner
        ))),
        None => Err(violation("no saved agent states".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use replay_core::ValueTableConfig;

    fn table() -> ValueTable {
        ValueTable::new(&ValueTableConfig {
            dims: vec![2],
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_run_name() {
        let day = TrainingDay::new("IBM", NaiveDate::from_ymd_opt(2019, 6, 3).unwrap());
        assert_eq!(
            run_name("QLEARNING_BUY_360_360_0.15", 4, &day),
            "MR_QLEARNING_BUY_360_360_0.15_EPISODE_4_IBM_20190603"
        );
    }

    #[test]
    fn test_takes_last_table() {
        let output = SimulationOutput {
            states: vec![
                AgentState::Background { agent_id: 0 },
                AgentState::ValueTable {
                    agent_id: 1,
                    table: table(),
                },
            ],
        };
        assert!(take_value_table("run", 1, output).is_ok());
    }

    #[test]
    fn test_rejects_empty_output() {
        let err = take_value_table("run", 1, SimulationOutput::default()).unwrap_err();
        assert!(matches!(err, SimulatorError::ContractViolation { .. }));
    }

    #[test]
    fn test_rejects_background_last() {
        let output = SimulationOutput {
            states: vec![
                AgentState::ValueTable {
                    agent_id: 1,
                    table: table(),
                },
                AgentState::Background { agent_id: 0 },
            ],
        };
        assert!(matches!(
            take_value_table("run", 1, output),
            Err(SimulatorError::ContractViolation { .. })
        ));
    }

    #[test]
    fn test_rejects_foreign_table() {
        let output = SimulationOutput {
            states: vec![AgentState::ValueTable {
                agent_id: 7,
                table: table(),
            }],
        };
        assert!(matches!(
            take_value_table("run", 1, output),
            Err(SimulatorError::ContractViolation { .. })
        ));
    }
}
