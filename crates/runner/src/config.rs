//! Training configuration
//!
//! Fixed at process start and shared read-only by every experiment.

use chrono::NaiveTime;
use replay_core::{TradingDate, ValueTableConfig, parse_date};
use replay_execution::default_session_open;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::checkpoint::DEFAULT_CHECKPOINT_PERIOD;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_checkpoint_period() -> usize {
    DEFAULT_CHECKPOINT_PERIOD
}

/// Process-wide training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Seed for training-day sampling, agent seeds and background populations
    pub seed: u64,
    /// Episodes per experiment (one training day each)
    pub num_episodes: usize,
    /// Security universe
    pub securities: Vec<String>,
    /// Trading-date universe (`YYYYMMDD`)
    pub dates: Vec<String>,
    /// Experiment identifiers to train
    pub experiments: Vec<String>,
    /// Checkpoint directory
    pub log_folder: PathBuf,
    /// Historical data root
    pub data_folder: PathBuf,
    /// Periodic checkpoint every N episodes
    #[serde(default = "default_checkpoint_period")]
    pub checkpoint_period: usize,
    /// Trading window start on every day
    #[serde(default = "default_session_open")]
    pub session_open: NaiveTime,
    /// Worker pool bound (defaults to the CPU count)
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// Shape and starting hyperparameters of every fresh value table
    #[serde(default)]
    pub value_table: ValueTableConfig,
}

/// Load training configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<TrainingConfig, ConfigError> {
    let config: TrainingConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<TrainingConfig, ConfigError> {
    let default_config = include_str!("default_config.json");
    load_config_from_str(default_config)
}

impl TrainingConfig {
    /// Parsed trading dates, in configured order
    pub fn trading_dates(&self) -> Result<Vec<TradingDate>, ConfigError> {
        self.dates
            .iter()
            .map(|d| parse_date(d).map_err(|e| ConfigError::Invalid(e.to_string())))
            .collect()
    }

    /// Number of experiments that may train at once
    pub fn worker_capacity(&self) -> usize {
        self.max_workers.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_episodes == 0 {
            return Err(ConfigError::Invalid("num_episodes must be positive".into()));
        }
        if self.securities.is_empty() {
            return Err(ConfigError::Invalid("no securities configured".into()));
        }
        if self.dates.is_empty() {
            return Err(ConfigError::Invalid("no trading dates configured".into()));
        }
        if self.experiments.is_empty() {
            return Err(ConfigError::Invalid("no experiments configured".into()));
        }
        if self.checkpoint_period == 0 {
            return Err(ConfigError::Invalid(
                "checkpoint_period must be positive".into(),
            ));
        }
        if self.max_workers == Some(0) {
            return Err(ConfigError::Invalid("max_workers must be positive".into()));
        }
        self.trading_dates()?;

        let table = &self.value_table;
        table
            .cell_count()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        check_decay("learning_rate_decay", table.learning_rate_decay)?;
        check_decay("exploration_rate_decay", table.exploration_rate_decay)?;
        if table.learning_rate_floor > table.learning_rate {
            return Err(ConfigError::Invalid(format!(
                "learning_rate_floor {} exceeds learning_rate {}",
                table.learning_rate_floor, table.learning_rate
            )));
        }
        if table.exploration_rate_floor > table.exploration_rate {
            return Err(ConfigError::Invalid(format!(
                "exploration_rate_floor {} exceeds exploration_rate {}",
                table.exploration_rate_floor, table.exploration_rate
            )));
        }
        Ok(())
    }
}

fn check_decay(name: &str, decay: f64) -> Result<(), ConfigError> {
    if decay > 0.0 && decay <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be in (0, 1], got {}",
            name, decay
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = load_default_config().unwrap();

        assert_eq!(config.seed, 28);
        assert_eq!(config.num_episodes, 2);
        assert_eq!(config.securities, vec!["IBM".to_string()]);
        assert_eq!(config.dates.len(), 15);
        assert_eq!(config.experiments, vec!["QLEARNING_BUY_360_360_0.15"]);
        assert_eq!(config.checkpoint_period, 10);
        assert_eq!(config.session_open, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(config.value_table, ValueTableConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_fields_default() {
        let config = load_config_from_str(
            r#"{
                "seed": 1,
                "num_episodes": 3,
                "securities": ["IBM"],
                "dates": ["20190603"],
                "experiments": ["QLEARNING_SELL_60_10_0.1"],
                "log_folder": "/tmp/log/",
                "data_folder": "/tmp/data/"
            }"#,
        )
        .unwrap();

        assert_eq!(config.checkpoint_period, DEFAULT_CHECKPOINT_PERIOD);
        assert_eq!(config.session_open, default_session_open());
        assert_eq!(config.max_workers, None);
        assert!(config.worker_capacity() >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = load_default_config().unwrap();

        let mut config = base.clone();
        config.num_episodes = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.dates.push("June 3rd".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.checkpoint_period = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.value_table.exploration_rate_decay = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base.clone();
        config.value_table.learning_rate_floor = 2.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = base;
        config.value_table.dims = vec![10, 0];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_explicit_worker_capacity() {
        let mut config = load_default_config().unwrap();
        config.max_workers = Some(4);
        assert_eq!(config.worker_capacity(), 4);
    }
}
