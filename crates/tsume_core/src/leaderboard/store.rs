use serde::{Deserialize, Serialize};
use std::fs::{rename, File};
use std::io::Write;
use std::path::Path;

use super::error::LeaderboardError;
use super::ranking::Ranking;

/// Records kept on this machine: the best score and a cached copy of the rankings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalRecords {
    #[serde(default)]
    pub high_score: u32,
    #[serde(default)]
    pub rankings: Vec<Ranking>,
}

impl LocalRecords {
    /// Load records; a missing file is an empty record set.
    pub fn load(path: &Path) -> Result<Self, LeaderboardError> {
        if !path.exists() {
            log::debug!("No local records at {:?}", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let records: LocalRecords = serde_json::from_str(&text)?;
        log::debug!("Loaded {} rankings from {:?}", records.rankings.len(), path);
        Ok(records)
    }

    pub fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec_pretty(self)?;

        // write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::info!("Saved {} rankings to {:?}", self.rankings.len(), path);
        Ok(())
    }

    /// Raise the stored best score; returns true when it changed.
    pub fn record_high_score(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }
}
