//! Replay Ports
//!
//! Port definitions (traits) for the collaborators the training core drives.
//! These define the boundaries between the training loop and the historical
//! data store, the agent population generator and the market simulator.

mod error;
mod history;
mod population;
mod simulator;

pub use error::{DataError, DataResult, SimulatorError, SimulatorResult};
pub use history::VolumeHistory;
pub use population::{BackgroundAgentFactory, BackgroundPopulation};
pub use simulator::{AgentState, MarketSimulator, SimulationOutput, SimulationRequest};
