use replay_core::{TradingDate, format_date};
use replay_ports::{DataError, DataResult, VolumeHistory};
use std::path::PathBuf;

/// File name of the per-minute volume series inside a day folder
const VOLUME_FILE: &str = "transacted_volume.json";

/// Reads per-minute traded volume from a market-replay log tree
///
/// Layout: `{root}/marketreplay_{security}_{YYYYMMDD}/transacted_volume.json`,
/// each file a JSON array of one-minute volumes.
#[derive(Debug, Clone)]
pub struct JsonVolumeStore {
    root: PathBuf,
}

impl JsonVolumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the volume series for one day
    pub fn path_for(&self, security: &str, date: TradingDate) -> PathBuf {
        self.root
            .join(format!("marketreplay_{}_{}", security, format_date(date)))
            .join(VOLUME_FILE)
    }
}

impl VolumeHistory for JsonVolumeStore {
    fn minute_volumes(&self, security: &str, date: TradingDate) -> DataResult<Vec<f64>> {
        let path = self.path_for(security, date);
        if !path.is_file() {
            return Err(DataError::NotFound {
                security: security.to_string(),
                date: format_date(date),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| DataError::Parse(format!("{:?}: {}", path, e)))
    }
}
