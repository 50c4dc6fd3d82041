//! Experiment Dispatcher - fan experiments out over a bounded worker pool
//!
//! ```text
//!   ids ──parse──► ExperimentSpec ──spawn──► [ worker ] ──┐
//!                                          [ worker ] ──┼──► result channel ──► outcomes
//!                   (permits = min(ids, capacity))  ... ──┘
//! ```
//!
//! Each worker owns its own value table; nothing is shared between workers
//! except read-only collaborators. A failing experiment never affects its
//! siblings.

use indicatif::{MultiProgress, ProgressBar};
use replay_core::{ExperimentSpec, TrainingDay};
use replay_execution::ScheduleBuilder;
use replay_ports::{BackgroundAgentFactory, MarketSimulator, VolumeHistory};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, mpsc};

use crate::checkpoint::CheckpointManager;
use crate::config::TrainingConfig;
use crate::episode::EpisodeRunner;
use crate::error::{Error, Result};
use crate::training::{TrainingLoop, TrainingSummary};

/// Completion signal for one experiment
#[derive(Debug)]
pub struct ExperimentOutcome {
    /// Experiment identifier as submitted
    pub experiment: String,
    /// Summary on success, the aborting error otherwise
    pub result: Result<TrainingSummary>,
}

impl ExperimentOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs one training loop per experiment identifier
pub struct ExperimentDispatcher {
    config: Arc<TrainingConfig>,
    history: Arc<dyn VolumeHistory>,
    population: Arc<dyn BackgroundAgentFactory>,
    simulator: Arc<dyn MarketSimulator>,
    capacity: usize,
    progress: MultiProgress,
}

impl ExperimentDispatcher {
    pub fn new(
        config: Arc<TrainingConfig>,
        history: Arc<dyn VolumeHistory>,
        population: Arc<dyn BackgroundAgentFactory>,
        simulator: Arc<dyn MarketSimulator>,
    ) -> Self {
        let capacity = config.worker_capacity();
        Self {
            config,
            history,
            population,
            simulator,
            capacity,
            progress: MultiProgress::new(),
        }
    }

    /// Override the worker capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Workers used for `experiments` submissions
    pub fn parallelism(&self, experiments: usize) -> usize {
        experiments.min(self.capacity).max(1)
    }

    /// Build the training loop for one experiment
    pub fn training_loop(&self, spec: ExperimentSpec) -> TrainingLoop {
        let schedules =
            ScheduleBuilder::with_session_open(self.history.clone(), self.config.session_open);
        let episodes = EpisodeRunner::new(
            self.simulator.clone(),
            self.population.clone(),
            self.config.seed,
        );
        let checkpoints =
            CheckpointManager::new(&self.config.log_folder, self.config.checkpoint_period);

        TrainingLoop::new(
            spec,
            schedules,
            episodes,
            checkpoints,
            self.config.value_table.clone(),
            self.config.seed,
        )
        .with_progress(self.progress.add(ProgressBar::new(self.config.num_episodes as u64)))
    }

    /// Train every experiment; outcomes come back in submission order
    pub async fn dispatch(
        &self,
        experiment_ids: &[String],
        days: Arc<Vec<TrainingDay>>,
    ) -> Vec<ExperimentOutcome> {
        let started = Instant::now();
        let workers = self.parallelism(experiment_ids.len());
        log::info!("Total Number of Experiments: {}", experiment_ids.len());
        log::info!("Worker pool size: {}", workers);

        let permits = Arc::new(Semaphore::new(workers));
        let (result_tx, mut result_rx) = mpsc::channel(experiment_ids.len().max(1));

        for (slot, id) in experiment_ids.iter().enumerate() {
            let spec = match ExperimentSpec::parse(id) {
                Ok(spec) => spec,
                Err(e) => {
                    // Never reaches a worker
                    let _ = result_tx.send((slot, Err(Error::from(e)))).await;
                    continue;
                }
            };

            let training = self.training_loop(spec);
            let permits = permits.clone();
            let result_tx = result_tx.clone();
            let days = days.clone();

            tokio::spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => training.run(&days).await,
                    Err(_) => Err(Error::InvalidInput("worker pool closed".to_string())),
                };
                let _ = result_tx.send((slot, result)).await;
            });
        }
        drop(result_tx);

        let mut results: Vec<Option<Result<TrainingSummary>>> =
            experiment_ids.iter().map(|_| None).collect();
        while let Some((slot, result)) = result_rx.recv().await {
            results[slot] = Some(result);
        }

        let outcomes: Vec<ExperimentOutcome> = experiment_ids
            .iter()
            .zip(results)
            .map(|(id, result)| ExperimentOutcome {
                experiment: id.clone(),
                // A worker that dropped its sender without reporting panicked
                result: result.unwrap_or_else(|| Err(Error::WorkerPanicked(id.clone()))),
            })
            .collect();

        for outcome in &outcomes {
            match &outcome.result {
                Ok(summary) => log::info!(
                    "Experiment {} completed: {} episodes, {} checkpoints",
                    outcome.experiment,
                    summary.episodes,
                    summary.checkpoints_written
                ),
                Err(e) => log::error!("Experiment {} failed: {}", outcome.experiment, e),
            }
        }
        log::info!(
            "Total time taken for the experiment: {:?}",
            started.elapsed()
        );

        outcomes
    }
}
