//! Checkpoints - durable snapshots of the value array
//!
//! Payload: bincode-encoded `{ dims, values }`, gzip-compressed. Files are
//! named after the experiment, so concurrent experiments never share a path:
//!
//! ```text
//! {log_folder}/{experiment}_Q_TABLE_EPISODE_{n}   every `period` episodes
//! {log_folder}/{experiment}_Q_TABLE               once, at the end of training
//! ```

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use replay_core::ValueTable;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Periodic checkpoint cadence in episodes
pub const DEFAULT_CHECKPOINT_PERIOD: usize = 10;

#[derive(Serialize)]
struct PayloadRef<'a> {
    dims: &'a [usize],
    values: &'a [f64],
}

/// Value array read back from a checkpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckpointPayload {
    pub dims: Vec<usize>,
    pub values: Vec<f64>,
}

/// Writes value-table snapshots under one log folder
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    log_folder: PathBuf,
    period: usize,
}

impl CheckpointManager {
    pub fn new(log_folder: impl Into<PathBuf>, period: usize) -> Self {
        Self {
            log_folder: log_folder.into(),
            period: period.max(1),
        }
    }

    /// Whether episode `episode` (1-based) gets a periodic checkpoint
    pub fn is_due(&self, episode: usize) -> bool {
        episode % self.period == 0
    }

    pub fn periodic_path(&self, experiment: &str, episode: usize) -> PathBuf {
        self.log_folder
            .join(format!("{}_Q_TABLE_EPISODE_{}", experiment, episode))
    }

    pub fn final_path(&self, experiment: &str) -> PathBuf {
        self.log_folder.join(format!("{}_Q_TABLE", experiment))
    }

    /// Persist the table if `episode` falls on the cadence
    ///
    /// Returns the written path, or `None` when no checkpoint was due.
    pub fn maybe_checkpoint(
        &self,
        experiment: &str,
        episode: usize,
        table: &ValueTable,
    ) -> Result<Option<PathBuf>> {
        if !self.is_due(episode) {
            return Ok(None);
        }
        let path = self.periodic_path(experiment, episode);
        write_payload(&path, table)?;
        Ok(Some(path))
    }

    /// Persist the table at the end of training
    pub fn final_checkpoint(&self, experiment: &str, table: &ValueTable) -> Result<PathBuf> {
        let path = self.final_path(experiment);
        write_payload(&path, table)?;
        Ok(path)
    }

    /// Read a checkpoint back
    pub fn load(path: impl AsRef<Path>) -> Result<CheckpointPayload> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| persist_error(path, e))?;
        let decoder = GzDecoder::new(BufReader::new(file));
        bincode::deserialize_from(decoder).map_err(|e| persist_error(path, e))
    }
}

/// Write to a sibling temp file, then rename into place
fn write_payload(path: &Path, table: &ValueTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| persist_error(path, e))?;
    }

    let mut temp = OsString::from(path.as_os_str());
    temp.push(".partial");
    let temp = PathBuf::from(temp);

    let written = write_temp(path, &temp, table)
        .and_then(|()| fs::rename(&temp, path).map_err(|e| persist_error(path, e)));
    if written.is_err() {
        let _ = fs::remove_file(&temp);
        return written;
    }

    log::debug!("Wrote checkpoint {:?}", path);
    Ok(())
}

fn write_temp(path: &Path, temp: &Path, table: &ValueTable) -> Result<()> {
    let file = File::create(temp).map_err(|e| persist_error(path, e))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let payload = PayloadRef {
        dims: table.dims(),
        values: table.values(),
    };
    bincode::serialize_into(&mut encoder, &payload).map_err(|e| persist_error(path, e))?;
    let mut writer = encoder.finish().map_err(|e| persist_error(path, e))?;
    writer.flush().map_err(|e| persist_error(path, e))
}

fn persist_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Persist {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::ValueTableConfig;
    use tempfile::tempdir;

    fn table() -> ValueTable {
        let mut table = ValueTable::new(&ValueTableConfig {
            dims: vec![3, 4, 2],
            ..Default::default()
        })
        .unwrap();
        table.values_mut()[3] = 0.25;
        table.values_mut()[22] = -7.5;
        table
    }

    #[test]
    fn test_paths() {
        let manager = CheckpointManager::new("/var/log/replay", 10);

        assert_eq!(
            manager.periodic_path("QLEARNING_BUY_360_360_0.15", 20),
            PathBuf::from("/var/log/replay/QLEARNING_BUY_360_360_0.15_Q_TABLE_EPISODE_20")
        );
        assert_eq!(
            manager.final_path("QLEARNING_BUY_360_360_0.15"),
            PathBuf::from("/var/log/replay/QLEARNING_BUY_360_360_0.15_Q_TABLE")
        );
    }

    #[test]
    fn test_cadence() {
        let manager = CheckpointManager::new("log", 10);
        let due: Vec<usize> = (1..=35).filter(|e| manager.is_due(*e)).collect();
        assert_eq!(due, vec![10, 20, 30]);
    }

    #[test]
    fn test_not_due_writes_nothing() {
        let dir = tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path(), 10);

        let written = manager.maybe_checkpoint("EXP", 7, &table()).unwrap();

        assert!(written.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_written_payload_reads_back() {
        let dir = tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path(), 5);
        let table = table();

        let path = manager.maybe_checkpoint("EXP", 5, &table).unwrap().unwrap();
        let payload = CheckpointManager::load(&path).unwrap();

        assert_eq!(payload.dims, vec![3, 4, 2]);
        assert_eq!(payload.values, table.values());

        let final_path = manager.final_checkpoint("EXP", &table).unwrap();
        assert_eq!(final_path, dir.path().join("EXP_Q_TABLE"));
        assert_eq!(CheckpointManager::load(final_path).unwrap(), payload);
    }

    #[test]
    fn test_creates_missing_log_folder() {
        let dir = tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path().join("nested").join("log"), 1);

        let path = manager.final_checkpoint("EXP", &table()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_folder_is_persist_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();
        let manager = CheckpointManager::new(&blocker, 1);

        let err = manager.final_checkpoint("EXP", &table()).unwrap_err();
        assert!(matches!(err, Error::Persist { .. }));
    }

    #[test]
    fn test_failed_rename_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path(), 1);
        // A directory in the way makes the final rename fail after the temp file is written
        let target = manager.final_path("EXP");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupied"), b"x").unwrap();

        let err = manager.final_checkpoint("EXP", &table()).unwrap_err();

        assert!(matches!(err, Error::Persist { .. }));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("EXP_Q_TABLE")]);
    }
}
