use serde::{Deserialize, Serialize};

use super::{direction::Direction, schedule::Schedule};
use crate::learning::ValueTable;
use crate::values::{Quantity, Security};

/// Opaque description of a background (non-learning) agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Simulator-wide agent id
    pub id: usize,
    /// Display name
    pub name: String,
    /// Agent type understood by the simulator
    pub kind: String,
    /// Seed for the agent's own randomness
    pub seed: u64,
}

/// The learning execution agent placed in every episode
///
/// Owns the value table for the duration of one simulation run.
#[derive(Debug, Clone)]
pub struct ExecutionAgent {
    /// Simulator-wide agent id, following the background population
    pub id: usize,
    /// Experiment identifier
    pub name: String,
    /// Security being traded
    pub security: Security,
    /// Buy or sell
    pub direction: Direction,
    /// Parent order size
    pub quantity: Quantity,
    /// Wakeup times and child quantities
    pub schedule: Schedule,
    /// Learned values carried across episodes
    pub value_table: ValueTable,
    /// Seed for the agent's action sampling
    pub seed: u64,
}
