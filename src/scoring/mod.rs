//! Points table construction.
//!
//! [`PointsSource`] is the seam the aggregator reads tables through;
//! [`StoreScoring`] builds them from imported season records.

use crate::error::Result;
use crate::models::{PointsTable, RoundLimit, Season};
use crate::store::{PointsStore, SeasonRecord};
use tracing::debug;

/// Anything that can produce the raw points table for a season.
pub trait PointsSource {
    /// Returns `Ok(None)` when there is no data for the season.
    fn year_points_table(&self, season: &Season, limit: RoundLimit) -> Result<Option<PointsTable>>;
}

/// Points source backed by the local season store.
pub struct StoreScoring<'a> {
    store: &'a PointsStore,
}

impl<'a> StoreScoring<'a> {
    pub fn new(store: &'a PointsStore) -> Self {
        Self { store }
    }
}

impl PointsSource for StoreScoring<'_> {
    fn year_points_table(&self, season: &Season, limit: RoundLimit) -> Result<Option<PointsTable>> {
        match self.store.load(season)? {
            Some(record) => Ok(Some(points_table(&record, limit)?)),
            None => Ok(None),
        }
    }
}

/// Build a table over the first rounds of a record, summing totals.
pub fn points_table(record: &SeasonRecord, limit: RoundLimit) -> Result<PointsTable> {
    let count = limit.round_count(record.rounds.len());
    let rounds: Vec<String> = record.rounds.iter().take(count).cloned().collect();
    debug!(
        "Scoring season {} through {} ({} of {} rounds)",
        record.season,
        limit,
        rounds.len(),
        record.rounds.len()
    );

    let mut table = PointsTable::new(rounds.clone());
    for participant in &record.participants {
        let points = rounds
            .iter()
            .map(|round| participant.points.get(round).copied())
            .collect();
        table.push_participant_summed(participant.name.clone(), points)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ParticipantRecord;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record() -> SeasonRecord {
        SeasonRecord {
            season: Season::Year(2009),
            rounds: ["Wildcard", "Division", "Conference", "Champions"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            participants: vec![
                ParticipantRecord {
                    name: "Alice".to_string(),
                    points: [
                        ("Wildcard".to_string(), 5.0),
                        ("Division".to_string(), 3.0),
                        ("Champions".to_string(), 4.0),
                    ]
                    .into_iter()
                    .collect(),
                },
                ParticipantRecord {
                    name: "Bob".to_string(),
                    points: [("Wildcard".to_string(), 0.0)].into_iter().collect(),
                },
            ],
            source: "test".to_string(),
            imported_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_season_totals() {
        let table = points_table(&record(), RoundLimit::Champions).unwrap();
        assert_eq!(table.rounds().len(), 4);
        assert_eq!(table.total("Alice"), Some(12.0));
        assert_eq!(table.value("Alice", "Conference"), None);
        assert_eq!(table.total("Bob"), Some(0.0));
        assert!(table.total_mismatches().is_empty());
    }

    #[test]
    fn test_partial_season_truncates_rounds() {
        let table = points_table(&record(), RoundLimit::Through(2)).unwrap();
        assert_eq!(table.rounds(), ["Wildcard", "Division"]);
        assert_eq!(table.total("Alice"), Some(8.0));
    }

    #[test]
    fn test_store_scoring_missing_season() {
        let dir = TempDir::new().unwrap();
        let store = PointsStore::open(dir.path());
        let scoring = StoreScoring::new(&store);

        let table = scoring
            .year_points_table(&Season::Year(2009), RoundLimit::Champions)
            .unwrap();
        assert!(table.is_none());
    }

    #[test]
    fn test_store_scoring_reads_record() {
        let dir = TempDir::new().unwrap();
        let store = PointsStore::open(dir.path());
        store.save(&record()).unwrap();

        let table = StoreScoring::new(&store)
            .year_points_table(&Season::Year(2009), RoundLimit::Through(1))
            .unwrap()
            .unwrap();
        let names: Vec<&str> = table.participants().collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(table.total("Alice"), Some(5.0));
    }
}
