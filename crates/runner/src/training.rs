//! Training loop - one experiment, start to finish
//!
//! ```text
//! Initializing ──► [ ScheduleBuild ─► EpisodeRun ─► Anneal ─► MaybeCheckpoint ] × N ──► Finalizing ──► Done
//! ```
//!
//! A schedule or simulator failure aborts the experiment: the table has
//! already been shaped by earlier days, and skipping a day would shift the
//! checkpoint cadence. Checkpoint write failures are logged and counted.

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use replay_core::{ExperimentSpec, TrainingDay, ValueTable, ValueTableConfig};
use replay_execution::ScheduleBuilder;
use std::path::PathBuf;

use crate::annealing::anneal;
use crate::blocking::run_blocking;
use crate::checkpoint::CheckpointManager;
use crate::config::TrainingConfig;
use crate::episode::{Episode, EpisodeRunner};
use crate::error::{Error, Result};

/// Draw the shared training-day sequence
///
/// `num_episodes` draws with replacement from `securities × dates`.
pub fn sample_training_days(config: &TrainingConfig) -> Result<Vec<TrainingDay>> {
    let dates = config.trading_dates()?;
    let universe: Vec<TrainingDay> = config
        .securities
        .iter()
        .flat_map(|security| {
            dates
                .iter()
                .map(move |date| TrainingDay::new(security.clone(), *date))
        })
        .collect();

    if universe.is_empty() {
        return Err(Error::InvalidInput(
            "training universe is empty".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let days: Vec<TrainingDay> = (0..config.num_episodes)
        .map(|_| universe[rng.gen_range(0..universe.len())].clone())
        .collect();

    log::info!("Total Number of Training Data Days: {}", days.len());
    Ok(days)
}

/// Final state of a completed experiment
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    /// Experiment identifier
    pub experiment: String,
    /// Episodes completed
    pub episodes: usize,
    /// Learning rate after the last anneal
    pub learning_rate: f64,
    /// Exploration rate after the last anneal
    pub exploration_rate: f64,
    /// Fraction of non-zero table cells at the end
    pub populated_fraction: f64,
    /// Periodic checkpoints written
    pub checkpoints_written: usize,
    /// Checkpoint writes that failed (periodic and final)
    pub checkpoint_failures: usize,
    /// Final checkpoint, if it was written
    pub final_checkpoint: Option<PathBuf>,
}

/// Trains one experiment over the training-day sequence
pub struct TrainingLoop {
    spec: ExperimentSpec,
    schedules: ScheduleBuilder,
    episodes: EpisodeRunner,
    checkpoints: CheckpointManager,
    table_config: ValueTableConfig,
    agent_rng: StdRng,
    progress: ProgressBar,
}

impl TrainingLoop {
    pub fn new(
        spec: ExperimentSpec,
        schedules: ScheduleBuilder,
        episodes: EpisodeRunner,
        checkpoints: CheckpointManager,
        table_config: ValueTableConfig,
        seed: u64,
    ) -> Self {
        Self {
            spec,
            schedules,
            episodes,
            checkpoints,
            table_config,
            agent_rng: StdRng::seed_from_u64(seed),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report episode progress on `progress` (hidden by default)
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        let style = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} episodes ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);
        self.progress = progress;
        self
    }

    /// Run every episode, then write the final checkpoint
    pub async fn run(mut self, days: &[TrainingDay]) -> Result<TrainingSummary> {
        let experiment = self.spec.id.clone();
        let total = days.len();
        let table_config = self.table_config.clone();
        let mut table = run_blocking(&experiment, move || ValueTable::new(&table_config)).await??;
        let mut checkpoints_written = 0;
        let mut checkpoint_failures = 0;
        self.progress.set_length(total as u64);
        self.progress.set_message(experiment.clone());

        log::info!(
            "{}: training {} episodes on a {:?} value table",
            experiment,
            total,
            table.dims()
        );

        for (offset, day) in days.iter().enumerate() {
            let index = offset + 1;
            log::info!("{}: episode {}/{} ({})", experiment, index, total, day);

            let schedules = self.schedules.clone();
            let security = day.security.clone();
            let date = day.date;
            let (horizon, slices, rate) = (
                self.spec.horizon_minutes,
                self.spec.slice_count,
                self.spec.participation_rate,
            );
            let schedule = run_blocking(&experiment, move || {
                schedules.build(&security, date, horizon, slices, rate)
            })
            .await??;

            let episode = Episode {
                experiment: &self.spec,
                day,
                index,
                schedule,
                agent_seed: u64::from(self.agent_rng.r#gen::<u32>()),
            };
            table = self.episodes.run(episode, table).await?;

            let checkpoints = self.checkpoints.clone();
            let name = experiment.clone();
            let (updated, rates, populated, written) = run_blocking(&experiment, move || {
                let rates = anneal(&mut table);
                let populated = table.populated_fraction();
                let written = checkpoints.maybe_checkpoint(&name, index, &table);
                (table, rates, populated, written)
            })
            .await?;
            table = updated;

            log::info!(
                "{}: alpha {:.6}, epsilon {:.6}",
                experiment,
                rates.learning_rate,
                rates.exploration_rate
            );
            log::info!("MR - Q-Table - Pct populated: {}%", populated * 100.0);

            match written {
                Ok(Some(path)) => {
                    checkpoints_written += 1;
                    log::info!("Saved Q for episode {} to {:?}", index, path);
                }
                Ok(None) => {}
                Err(e) => {
                    checkpoint_failures += 1;
                    log::error!("{}: {}", experiment, e);
                }
            }
            self.progress.inc(1);
        }

        let checkpoints = self.checkpoints.clone();
        let name = experiment.clone();
        let (table, populated_fraction, written) = run_blocking(&experiment, move || {
            let written = checkpoints.final_checkpoint(&name, &table);
            let populated = table.populated_fraction();
            (table, populated, written)
        })
        .await?;

        let final_checkpoint = match written {
            Ok(path) => {
                log::info!("Saved final Q to {:?}", path);
                Some(path)
            }
            Err(e) => {
                checkpoint_failures += 1;
                log::error!("{}: {}", experiment, e);
                None
            }
        };

        self.progress.finish();
        log::info!("{}: training complete after {} episodes", experiment, total);

        Ok(TrainingSummary {
            experiment,
            episodes: total,
            learning_rate: table.learning_rate,
            exploration_rate: table.exploration_rate,
            populated_fraction,
            checkpoints_written,
            checkpoint_failures,
            final_checkpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_default_config;

    #[test]
    fn test_sampling_is_reproducible() {
        let mut config = load_default_config().unwrap();
        config.num_episodes = 25;

        let first = sample_training_days(&config).unwrap();
        let second = sample_training_days(&config).unwrap();

        assert_eq!(first.len(), 25);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sampling_stays_in_universe() {
        let mut config = load_default_config().unwrap();
        config.securities = vec!["IBM".to_string(), "MSFT".to_string()];
        config.dates = vec!["20190603".to_string(), "20190604".to_string()];
        config.num_episodes = 40;

        let days = sample_training_days(&config).unwrap();
        let dates = config.trading_dates().unwrap();

        assert_eq!(days.len(), 40);
        assert!(days.iter().all(|d| config.securities.contains(&d.security)));
        assert!(days.iter().all(|d| dates.contains(&d.date)));
    }

    #[test]
    fn test_sampling_depends_on_seed() {
        let mut config = load_default_config().unwrap();
        config.num_episodes = 30;
        let first = sample_training_days(&config).unwrap();

        config.seed += 1;
        let second = sample_training_days(&config).unwrap();

        assert_ne!(first, second);
    }
}
