//! Archival season import.
//!
//! An archive is a TOML file describing one season:
//!
//! ```toml
//! season = 2009
//! rounds = ["Wildcard", "Division", "Conference", "Champions"]
//!
//! [[participants]]
//! name = "Alice"
//! points = { Wildcard = 5, Division = 3 }
//! ```
//!
//! Rounds missing from a participant's `points` table were not scored.

use crate::error::{ChartError, Result};
use crate::models::{is_total, Season};
use crate::store::{ParticipantRecord, PointsStore, SeasonRecord};
use chrono::Utc;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parsed contents of an archive file.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveFile {
    pub season: Season,
    pub rounds: Vec<String>,
    #[serde(default)]
    pub participants: Vec<ArchiveParticipant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveParticipant {
    pub name: String,
    #[serde(default)]
    pub points: BTreeMap<String, f64>,
}

/// What an import wrote.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub season: Season,
    pub participants: usize,
    pub rounds: usize,
    pub record_path: PathBuf,
}

/// Read and validate an archive file.
pub fn parse_archive(path: &Path) -> Result<ArchiveFile> {
    let content = fs::read_to_string(path)
        .map_err(|e| ChartError::io(format!("Failed to read archive {}", path.display()), e))?;

    let archive: ArchiveFile = toml::from_str(&content).map_err(|e| ChartError::Archive {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    validate(&archive).map_err(|reason| ChartError::Archive {
        path: path.to_path_buf(),
        reason,
    })?;

    Ok(archive)
}

fn validate(archive: &ArchiveFile) -> std::result::Result<(), String> {
    if archive.rounds.is_empty() {
        return Err("rounds list is empty".to_string());
    }

    let mut rounds = HashSet::new();
    for round in &archive.rounds {
        if round.trim().is_empty() {
            return Err("round labels must not be blank".to_string());
        }
        if is_total(round) {
            return Err("'Total' is reserved and cannot be a round".to_string());
        }
        if !rounds.insert(round.as_str()) {
            return Err(format!("round '{}' is listed twice", round));
        }
    }

    let mut names = HashSet::new();
    for participant in &archive.participants {
        if participant.name.trim().is_empty() {
            return Err("participant names must not be blank".to_string());
        }
        if !names.insert(participant.name.as_str()) {
            return Err(format!("participant '{}' is listed twice", participant.name));
        }
        for (round, value) in &participant.points {
            if !rounds.contains(round.as_str()) {
                return Err(format!(
                    "participant '{}' has points for unknown round '{}'",
                    participant.name, round
                ));
            }
            if !value.is_finite() {
                return Err(format!(
                    "participant '{}' has a non-finite score in round '{}'",
                    participant.name, round
                ));
            }
        }
    }

    Ok(())
}

/// Convert a validated archive into a store record.
pub fn to_record(archive: ArchiveFile, source: &Path) -> SeasonRecord {
    SeasonRecord {
        season: archive.season,
        rounds: archive.rounds,
        participants: archive
            .participants
            .into_iter()
            .map(|p| ParticipantRecord {
                name: p.name,
                points: p.points,
            })
            .collect(),
        source: source.display().to_string(),
        imported_at: Utc::now(),
    }
}

/// Import one archive file into the store, replacing any earlier import.
pub fn import_archive(path: &Path, store: &PointsStore) -> Result<ImportSummary> {
    info!("Importing archive {}", path.display());

    let archive = parse_archive(path)?;
    let record = to_record(archive, path);
    debug!(
        "Season {}: {} rounds, {} participants",
        record.season,
        record.rounds.len(),
        record.participants.len()
    );

    let record_path = store.save(&record)?;

    Ok(ImportSummary {
        season: record.season,
        participants: record.participants.len(),
        rounds: record.rounds.len(),
        record_path,
    })
}
