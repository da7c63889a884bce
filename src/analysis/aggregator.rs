//! Points aggregation and ranking.
//!
//! This module turns a raw points table from a [`PointsSource`] into a
//! table ordered by ascending total, ready for charting.

use crate::error::{ChartError, Result};
use crate::models::{ParticipantRanking, PointsTable, RoundLimit, Season};
use crate::scoring::PointsSource;
use tracing::{debug, warn};

/// Fetch the table for a season and order its columns by total.
///
/// Fails with [`ChartError::DataUnavailable`] if the source has no table.
pub fn build_ranked_table<S>(
    source: &S,
    season: &Season,
    limit: RoundLimit,
) -> Result<(PointsTable, ParticipantRanking)>
where
    S: PointsSource + ?Sized,
{
    let unsorted = source
        .year_points_table(season, limit)?
        .ok_or_else(|| ChartError::DataUnavailable(season.to_string()))?;

    let mismatched = unsorted.total_mismatches();
    if !mismatched.is_empty() {
        warn!(
            "Season {}: Total row disagrees with round points for {}",
            season,
            mismatched.join(", ")
        );
    }

    let ranking = ParticipantRanking::from_totals(&unsorted);
    let table = unsorted.reindex(&ranking)?;
    debug!(
        "Ranked {} participants for season {}",
        ranking.len(),
        season
    );

    Ok((table, ranking))
}

/// Participants from highest to lowest total.
pub fn leaders_first(ranking: &ParticipantRanking) -> Vec<&str> {
    ranking.iter().rev().collect()
}

/// Sum of drawn points per round across all participants, in round order.
///
/// Rounds where nobody has a value are `None`.
pub fn round_totals(table: &PointsTable) -> Vec<(String, Option<f64>)> {
    table
        .rounds()
        .iter()
        .enumerate()
        .map(|(idx, round)| {
            let values: Vec<f64> = table
                .columns()
                .iter()
                .filter_map(|c| c.points[idx])
                .collect();
            let sum = if values.is_empty() {
                None
            } else {
                Some(values.iter().sum())
            };
            (round.clone(), sum)
        })
        .collect()
}
