//! Local season store.
//!
//! Imported seasons are kept as one pretty-printed JSON document per
//! season under the store root (`<root>/<season>.json`).

use crate::error::{ChartError, Result};
use crate::models::Season;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A participant's recorded points, keyed by round label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Participant name.
    pub name: String,
    /// Points per round. Rounds without an entry were not scored.
    #[serde(default)]
    pub points: BTreeMap<String, f64>,
}

/// Everything stored about one imported season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    /// The season these points belong to.
    pub season: Season,
    /// Round labels in playing order.
    pub rounds: Vec<String>,
    /// Participants in archive order.
    pub participants: Vec<ParticipantRecord>,
    /// Path of the archive the record was imported from.
    pub source: String,
    /// When the record was written.
    pub imported_at: DateTime<Utc>,
}

/// Directory-backed store of season records.
#[derive(Debug, Clone)]
pub struct PointsStore {
    root: PathBuf,
}

impl PointsStore {
    /// Open a store rooted at `root`. The directory is created on first save.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document holding `season`.
    pub fn record_path(&self, season: &Season) -> PathBuf {
        self.root.join(format!("{}.json", season.dir_name()))
    }

    /// Write a season record, replacing any previous import of the season.
    pub fn save(&self, record: &SeasonRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).map_err(|e| {
            ChartError::io(
                format!("Failed to create store directory {}", self.root.display()),
                e,
            )
        })?;

        let path = self.record_path(&record.season);
        let json = serde_json::to_string_pretty(record).map_err(|e| ChartError::Store {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json)
            .map_err(|e| ChartError::io(format!("Failed to write {}", path.display()), e))?;

        debug!("Stored season {} at {}", record.season, path.display());
        Ok(path)
    }

    /// Load a season record. Returns `Ok(None)` if the season was never imported.
    pub fn load(&self, season: &Season) -> Result<Option<SeasonRecord>> {
        let path = self.record_path(season);
        if !path.exists() {
            debug!("No store record for season {} ({})", season, path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| ChartError::io(format!("Failed to read {}", path.display()), e))?;
        let record = serde_json::from_str(&content).map_err(|e| ChartError::Store {
            path: path.clone(),
            source: e,
        })?;
        Ok(Some(record))
    }

    /// List the seasons present in the store, sorted.
    pub fn seasons(&self) -> Result<Vec<Season>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| {
            ChartError::io(format!("Failed to list {}", self.root.display()), e)
        })?;

        let mut seasons: Vec<Season> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(Season::parse)
            })
            .collect();

        seasons.sort();
        Ok(seasons)
    }
}
