//! Adapters for the collaborator ports used by the `trainer` binary

mod dry_run;
mod population;
mod volume_store;

pub use dry_run::DryRunSimulator;
pub use population::MarketReplayPopulation;
pub use volume_store::JsonVolumeStore;
