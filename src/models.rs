//! Data models for playoff points standings.
//!
//! This module contains the core data structures used throughout
//! the application: seasons, round limits, points tables and rankings.

use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label of the row holding each participant's summed points.
pub const TOTAL_ROW: &str = "Total";

/// Round after which the cumulative total is annotated on the chart.
pub const CONFERENCE_ROUND: &str = "Conference";

/// Returns true if the round label is the Conference sentinel.
pub fn is_conference(round: &str) -> bool {
    round.trim().eq_ignore_ascii_case(CONFERENCE_ROUND)
}

/// Returns true if the label names the Total row.
pub fn is_total(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case(TOTAL_ROW)
}

/// Format a points value the way it is printed on charts and tables.
///
/// Whole numbers drop the fractional part (`5` rather than `5.0`).
pub fn format_points(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// A season identifier: a year or a free-form sentinel label.
///
/// Deserialized strings go through [`Season::parse`], so `"2009"` is a year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged, from = "SeasonRepr")]
pub enum Season {
    /// A calendar year, e.g. `2009`.
    Year(u16),
    /// Any other label, e.g. `2016-wildcard`.
    Label(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeasonRepr {
    Year(u16),
    Text(String),
}

impl From<SeasonRepr> for Season {
    fn from(repr: SeasonRepr) -> Self {
        match repr {
            SeasonRepr::Year(year) => Season::Year(year),
            SeasonRepr::Text(text) => Season::parse(&text),
        }
    }
}

impl Season {
    /// Parse a season from user input. Numeric input becomes a year.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u16>() {
            Ok(year) => Season::Year(year),
            Err(_) => Season::Label(trimmed.to_string()),
        }
    }

    /// Name used for the season's output directories and store file.
    ///
    /// Always a single normal path component: separators become `-`, and
    /// names made only of dots (or nothing) have every dot replaced by `_`.
    pub fn dir_name(&self) -> String {
        let name: String = self
            .to_string()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '-',
                c if c.is_whitespace() => '-',
                c => c,
            })
            .collect();

        if name.is_empty() {
            "_".to_string()
        } else if name.chars().all(|c| c == '.') {
            name.replace('.', "_")
        } else {
            name
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Year(year) => write!(f, "{}", year),
            Season::Label(label) => write!(f, "{}", label),
        }
    }
}

impl FromStr for Season {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Season::parse(s))
    }
}

/// How many rounds of a season to include in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundLimit {
    /// The first `n` rounds (1-based).
    Through(usize),
    /// Every round, through the championship.
    #[default]
    Champions,
}

impl RoundLimit {
    /// Number of rounds to keep out of `available`.
    pub fn round_count(&self, available: usize) -> usize {
        match self {
            RoundLimit::Through(n) => (*n).min(available),
            RoundLimit::Champions => available,
        }
    }
}

impl fmt::Display for RoundLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundLimit::Through(n) => write!(f, "round {}", n),
            RoundLimit::Champions => write!(f, "champions"),
        }
    }
}

impl FromStr for RoundLimit {
    type Err = ChartError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("champions") {
            return Ok(RoundLimit::Champions);
        }
        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => Ok(RoundLimit::Through(n)),
            _ => Err(ChartError::InvalidRoundLimit(s.to_string())),
        }
    }
}

/// One participant's points per round plus their total.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantColumn {
    /// Participant name.
    pub name: String,
    /// Points per round, aligned with the table's rounds. `None` means
    /// the participant did not score in that round.
    pub points: Vec<Option<f64>>,
    /// The Total row entry.
    pub total: f64,
}

impl ParticipantColumn {
    /// Sum of the present round values.
    pub fn summed_points(&self) -> f64 {
        self.points.iter().flatten().sum()
    }
}

/// Points per (round, participant) with a Total row.
///
/// Rows are the ordered round labels (the Total row is kept separately on
/// each column); columns are participants.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointsTable {
    rounds: Vec<String>,
    columns: Vec<ParticipantColumn>,
}

impl PointsTable {
    /// Creates an empty table over the given rounds.
    pub fn new(rounds: Vec<String>) -> Self {
        Self {
            rounds,
            columns: Vec::new(),
        }
    }

    /// Add a participant column with an explicit Total entry.
    pub fn push_participant(
        &mut self,
        name: impl Into<String>,
        points: Vec<Option<f64>>,
        total: f64,
    ) -> Result<()> {
        let name = name.into();
        if points.len() != self.rounds.len() {
            return Err(ChartError::Render(format!(
                "participant {} has {} values for {} rounds",
                name,
                points.len(),
                self.rounds.len()
            )));
        }
        if self.column(&name).is_some() {
            return Err(ChartError::Render(format!(
                "participant {} appears twice",
                name
            )));
        }
        self.columns.push(ParticipantColumn {
            name,
            points,
            total,
        });
        Ok(())
    }

    /// Add a participant column whose Total is the sum of present values.
    pub fn push_participant_summed(
        &mut self,
        name: impl Into<String>,
        points: Vec<Option<f64>>,
    ) -> Result<()> {
        let total = points.iter().flatten().sum();
        self.push_participant(name, points, total)
    }

    /// Ordered round labels, excluding Total.
    pub fn rounds(&self) -> &[String] {
        &self.rounds
    }

    /// Participant columns in table order.
    pub fn columns(&self) -> &[ParticipantColumn] {
        &self.columns
    }

    /// Participant names in table order.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a participant's column.
    pub fn column(&self, name: &str) -> Option<&ParticipantColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Points for a participant in a round, if they scored.
    pub fn value(&self, participant: &str, round: &str) -> Option<f64> {
        let round_idx = self.rounds.iter().position(|r| r == round)?;
        self.column(participant)?.points[round_idx]
    }

    /// A participant's Total entry.
    pub fn total(&self, participant: &str) -> Option<f64> {
        self.column(participant).map(|c| c.total)
    }

    /// Largest Total across all participants (0 for an empty table).
    pub fn max_total(&self) -> f64 {
        self.columns.iter().map(|c| c.total).fold(0.0, f64::max)
    }

    /// Returns true if the table has no participants.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Names of participants whose Total differs from their summed rounds.
    pub fn total_mismatches(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| (c.summed_points() - c.total).abs() > 1e-9)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Reorder the columns to follow `ranking`.
    pub fn reindex(&self, ranking: &ParticipantRanking) -> Result<PointsTable> {
        let mut columns = Vec::with_capacity(ranking.len());
        for name in ranking.iter() {
            let column = self.column(name).ok_or_else(|| {
                ChartError::Render(format!("ranked participant {} is not in the table", name))
            })?;
            columns.push(column.clone());
        }
        Ok(PointsTable {
            rounds: self.rounds.clone(),
            columns,
        })
    }
}

/// Participants ordered by ascending Total (lowest first).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParticipantRanking(Vec<String>);

impl ParticipantRanking {
    /// Stable ascending sort of the table's participants on Total.
    pub fn from_totals(table: &PointsTable) -> Self {
        let mut columns: Vec<&ParticipantColumn> = table.columns().iter().collect();
        columns.sort_by(|a, b| a.total.total_cmp(&b.total));
        Self(columns.into_iter().map(|c| c.name.clone()).collect())
    }

    /// Names from lowest to highest total.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of ranked participants.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nobody is ranked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The ranking as a slice, lowest total first.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for ParticipantRanking {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounds(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_season_parse() {
        assert_eq!(Season::parse("2009"), Season::Year(2009));
        assert_eq!(
            Season::parse(" 2016-wildcard "),
            Season::Label("2016-wildcard".to_string())
        );
        assert_eq!(Season::Year(2009).to_string(), "2009");
    }

    #[test]
    fn test_season_dir_name_replaces_separators() {
        let season = Season::Label("2016 final/replay".to_string());
        assert_eq!(season.dir_name(), "2016-final-replay");
    }

    #[test]
    fn test_season_dir_name_stays_inside_root() {
        assert_eq!(Season::Label("..".to_string()).dir_name(), "__");
        assert_eq!(Season::Label(".".to_string()).dir_name(), "_");
        assert_eq!(Season::Label(String::new()).dir_name(), "_");
        assert_eq!(Season::Label("../2009".to_string()).dir_name(), "..-2009");

        let root = std::path::Path::new("figures");
        let dir = root.join(Season::Label("..".to_string()).dir_name());
        assert!(dir
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_))));
    }

    #[test]
    fn test_season_deserializes_numeric_text_as_year() {
        #[derive(Deserialize)]
        struct Doc {
            season: Season,
        }

        let quoted: Doc = toml::from_str("season = \"2009\"").unwrap();
        assert_eq!(quoted.season, Season::Year(2009));
        let bare: Doc = toml::from_str("season = 2009").unwrap();
        assert_eq!(bare.season, Season::Year(2009));
        let label: Doc = toml::from_str("season = \" 2016-wildcard \"").unwrap();
        assert_eq!(label.season, Season::Label("2016-wildcard".to_string()));

        let json: Season = serde_json::from_str("\"2009\"").unwrap();
        assert_eq!(json, Season::Year(2009));
        assert_eq!(serde_json::to_string(&Season::Year(2009)).unwrap(), "2009");
    }

    #[test]
    fn test_round_limit_parse() {
        assert_eq!("3".parse::<RoundLimit>().unwrap(), RoundLimit::Through(3));
        assert_eq!(
            "Champions".parse::<RoundLimit>().unwrap(),
            RoundLimit::Champions
        );
        assert!("0".parse::<RoundLimit>().is_err());
        assert!("semis".parse::<RoundLimit>().is_err());
    }

    #[test]
    fn test_round_limit_clamps() {
        assert_eq!(RoundLimit::Through(2).round_count(4), 2);
        assert_eq!(RoundLimit::Through(9).round_count(4), 4);
        assert_eq!(RoundLimit::Champions.round_count(4), 4);
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(5.0), "5");
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(2.5), "2.5");
    }

    #[test]
    fn test_push_participant_rejects_wrong_width() {
        let mut table = PointsTable::new(rounds(&["Wildcard", "Division"]));
        assert!(table.push_participant("A", vec![Some(1.0)], 1.0).is_err());
    }

    #[test]
    fn test_value_distinguishes_missing_from_zero() {
        let mut table = PointsTable::new(rounds(&["Wildcard", "Division"]));
        table
            .push_participant_summed("A", vec![Some(0.0), None])
            .unwrap();
        assert_eq!(table.value("A", "Wildcard"), Some(0.0));
        assert_eq!(table.value("A", "Division"), None);
        assert_eq!(table.total("A"), Some(0.0));
    }

    #[test]
    fn test_ranking_is_stable_ascending() {
        let mut table = PointsTable::new(rounds(&["Wildcard"]));
        for (name, total) in [("A", 10.0), ("B", 5.0), ("C", 5.0), ("D", 20.0)] {
            table.push_participant_summed(name, vec![Some(total)]).unwrap();
        }

        let ranking = ParticipantRanking::from_totals(&table);
        let order: Vec<&str> = ranking.iter().collect();
        assert_eq!(order, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_ranking_orders_nan_totals_last() {
        let mut table = PointsTable::new(rounds(&["Wildcard"]));
        for (name, total) in [("A", f64::NAN), ("B", 1.0), ("C", 0.0), ("D", 1.0)] {
            table.push_participant(name, vec![Some(total)], total).unwrap();
        }

        let ranking = ParticipantRanking::from_totals(&table);
        let order: Vec<&str> = ranking.iter().collect();
        assert_eq!(order, vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_reindex_follows_ranking() {
        let mut table = PointsTable::new(rounds(&["Wildcard"]));
        table.push_participant_summed("A", vec![Some(3.0)]).unwrap();
        table.push_participant_summed("B", vec![Some(1.0)]).unwrap();

        let ranking = ParticipantRanking::from_totals(&table);
        let sorted = table.reindex(&ranking).unwrap();
        let names: Vec<&str> = sorted.participants().collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_total_mismatches() {
        let mut table = PointsTable::new(rounds(&["Wildcard", "Division"]));
        table
            .push_participant("A", vec![Some(5.0), Some(3.0)], 8.0)
            .unwrap();
        table
            .push_participant("B", vec![Some(5.0), None], 7.0)
            .unwrap();
        assert_eq!(table.total_mismatches(), vec!["B".to_string()]);
    }
}
