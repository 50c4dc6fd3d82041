//! Trainer Binary
//!
//! Loads the training configuration, samples the training days and trains
//! every configured experiment.

use anyhow::{Context, bail};
use clap::Parser;
use replay_runner::infrastructure::{DryRunSimulator, JsonVolumeStore, MarketReplayPopulation};
use replay_runner::{ExperimentDispatcher, load_config, load_default_config, sample_training_days};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "trainer", about = "Train execution agents on replayed market days")]
struct Args {
    /// JSON training configuration (defaults to the embedded configuration)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the worker pool size
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading {:?}", path))?,
        None => load_default_config()?,
    };
    if args.workers.is_some() {
        config.max_workers = args.workers;
    }
    config.validate()?;

    let days = Arc::new(sample_training_days(&config)?);
    let experiments = config.experiments.clone();
    let history = Arc::new(JsonVolumeStore::new(&config.data_folder));

    let dispatcher = ExperimentDispatcher::new(
        Arc::new(config),
        history,
        Arc::new(MarketReplayPopulation),
        Arc::new(DryRunSimulator),
    );
    let outcomes = dispatcher.dispatch(&experiments, days).await;

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        bail!("{} of {} experiments failed", failed, outcomes.len());
    }
    Ok(())
}
