//! Replay Runner - Execution Agent Training
//!
//! Trains a tabular execution policy by replaying historical days through a
//! market simulator, one episode per day:
//!
//! - **Schedule**: participation-sized flat child-order schedule for the day
//! - **Episode**: background population + execution agent, one simulator run
//! - **Annealing**: learning/exploration decay with floors after each episode
//! - **Checkpoint**: value array snapshots every N episodes and at the end
//! - **Dispatcher**: independent experiments over a bounded worker pool
//!
//! ## Architecture
//!
//! ```text
//!                    ┌──────────────────────┐
//!                    │ ExperimentDispatcher │
//!                    └──────────┬───────────┘
//!               one worker per experiment (bounded)
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        TrainingLoop                          │
//! │                                                              │
//! │  for each training day:                                      │
//! │  ┌───────────────┐  ┌───────────────┐  ┌────────┐  ┌──────┐  │
//! │  │ScheduleBuilder├─►│ EpisodeRunner ├─►│ anneal ├─►│ ckpt │  │
//! │  └───────┬───────┘  └───────┬───────┘  └────────┘  └──────┘  │
//! └──────────┼──────────────────┼────────────────────────────────┘
//!            ▼                  ▼
//!   ┌────────────────┐  ┌───────────────────┐
//!   │ VolumeHistory  │  │  MarketSimulator  │
//!   └────────────────┘  └───────────────────┘
//! ```

pub mod annealing;
mod blocking;
pub mod checkpoint;
pub mod config;
pub mod dispatcher;
pub mod episode;
pub mod error;
pub mod infrastructure;
pub mod training;

// Re-export main types
pub use annealing::{AnnealedRates, anneal};
pub use checkpoint::{CheckpointManager, CheckpointPayload, DEFAULT_CHECKPOINT_PERIOD};
pub use config::{ConfigError, TrainingConfig, load_config, load_default_config};
pub use dispatcher::{ExperimentDispatcher, ExperimentOutcome};
pub use episode::{Episode, EpisodeRunner, run_name};
pub use error::{Error, Result};
pub use training::{TrainingLoop, TrainingSummary, sample_training_days};
