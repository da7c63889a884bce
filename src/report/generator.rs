//! LaTeX standings generation.
//!
//! This module writes a `table`/`tabular` environment with the standings
//! of a season after a given playoff round, leader first.

use crate::analysis::{build_ranked_table, leaders_first};
use crate::error::{ChartError, Result};
use crate::models::{format_points, ParticipantRanking, PointsTable, RoundLimit, Season};
use crate::scoring::PointsSource;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Placeholder for a round the participant did not score in.
const MISSING_CELL: &str = "--";

/// Generate the LaTeX standings table for a ranked points table.
pub fn generate_latex_standings(
    table: &PointsTable,
    ranking: &ParticipantRanking,
    season: &Season,
    through_round: usize,
) -> String {
    render_standings(table, ranking, season, through_round, Utc::now())
}

fn render_standings(
    table: &PointsTable,
    ranking: &ParticipantRanking,
    season: &Season,
    through_round: usize,
    generated_at: DateTime<Utc>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "% Generated by playoff-points {} on {}\n",
        env!("CARGO_PKG_VERSION"),
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str("\\begin{table}[ht]\n");
    output.push_str("\\centering\n");

    let columns = std::iter::once("l")
        .chain(std::iter::repeat("r").take(table.rounds().len() + 1))
        .collect::<Vec<_>>()
        .join(" ");
    output.push_str(&format!("\\begin{{tabular}}{{{}}}\n", columns));
    output.push_str("\\hline\n");

    output.push_str(&generate_header_row(table.rounds()));
    output.push_str("\\hline\n");

    for name in leaders_first(ranking) {
        output.push_str(&generate_participant_row(table, name));
    }

    output.push_str("\\hline\n");
    output.push_str("\\end{tabular}\n");

    let last_round = table
        .rounds()
        .last()
        .map(|r| escape_latex(r))
        .unwrap_or_else(|| "the start of the playoffs".to_string());
    output.push_str(&format!(
        "\\caption{{Standings for {} after {}}}\n",
        escape_latex(&season.to_string()),
        last_round
    ));
    output.push_str(&format!(
        "\\label{{tab:standings-{}-round{}}}\n",
        season.dir_name(),
        through_round
    ));
    output.push_str("\\end{table}\n");

    output
}

fn generate_header_row(rounds: &[String]) -> String {
    let mut cells = vec!["Participant".to_string()];
    cells.extend(rounds.iter().map(|r| escape_latex(r)));
    cells.push("Total".to_string());
    format!("{} \\\\\n", cells.join(" & "))
}

fn generate_participant_row(table: &PointsTable, name: &str) -> String {
    let mut cells = vec![escape_latex(name)];
    match table.column(name) {
        Some(column) => {
            cells.extend(column.points.iter().map(|value| match value {
                Some(points) => format_points(*points),
                None => MISSING_CELL.to_string(),
            }));
            cells.push(format_points(column.total));
        }
        None => {
            cells.extend(std::iter::repeat(MISSING_CELL.to_string()).take(table.rounds().len() + 1));
        }
    }
    format!("{} \\\\\n", cells.join(" & "))
}

/// Escape LaTeX special characters in free text.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// `<latex_root>/<season>/round{n}.tex`.
pub fn latex_path(latex_root: &Path, season: &Season, playoff_round: usize) -> PathBuf {
    latex_root
        .join(season.dir_name())
        .join(format!("round{}.tex", playoff_round))
}

/// Write the standings after `playoff_round` for a season.
///
/// Returns the path of the written file.
pub fn make_latex_file<S>(
    source: &S,
    season: &Season,
    playoff_round: usize,
    latex_root: &Path,
) -> Result<PathBuf>
where
    S: PointsSource + ?Sized,
{
    if playoff_round == 0 {
        return Err(ChartError::InvalidRoundLimit(playoff_round.to_string()));
    }

    let (table, ranking) =
        build_ranked_table(source, season, RoundLimit::Through(playoff_round))?;
    let content = generate_latex_standings(&table, &ranking, season, playoff_round);

    let path = latex_path(latex_root, season, playoff_round);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ChartError::io(
                format!("Failed to create LaTeX directory {}", parent.display()),
                e,
            )
        })?;
    }
    fs::write(&path, content)
        .map_err(|e| ChartError::io(format!("Failed to write {}", path.display()), e))?;

    debug!("{} participants written to {}", ranking.len(), path.display());
    info!(
        "LaTeX standings for season {} round {} written",
        season, playoff_round
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct FixedSource(PointsTable);

    impl PointsSource for FixedSource {
        fn year_points_table(
            &self,
            _season: &Season,
            limit: RoundLimit,
        ) -> Result<Option<PointsTable>> {
            let count = limit.round_count(self.0.rounds().len());
            let rounds = self.0.rounds()[..count].to_vec();
            let mut table = PointsTable::new(rounds);
            for column in self.0.columns() {
                table.push_participant_summed(
                    column.name.clone(),
                    column.points[..count].to_vec(),
                )?;
            }
            Ok(Some(table))
        }
    }

    fn create_test_table() -> PointsTable {
        let mut table = PointsTable::new(vec!["Wildcard".to_string(), "Division".to_string()]);
        table
            .push_participant_summed("Low & Co", vec![Some(1.0), None])
            .unwrap();
        table
            .push_participant_summed("High_Roller", vec![Some(4.0), Some(2.5)])
            .unwrap();
        table
    }

    #[test]
    fn test_escape_latex() {
        assert_eq!(escape_latex("A&B"), "A\\&B");
        assert_eq!(escape_latex("50% _off_"), "50\\% \\_off\\_");
        assert_eq!(escape_latex("a\\b"), "a\\textbackslash{}b");
        assert_eq!(escape_latex("~^"), "\\textasciitilde{}\\textasciicircum{}");
        assert_eq!(escape_latex("Plain"), "Plain");
    }

    #[test]
    fn test_standings_are_leader_first() {
        let table = create_test_table();
        let ranking = ParticipantRanking::from_totals(&table);
        let generated_at = Utc.with_ymd_and_hms(2017, 2, 6, 12, 0, 0).unwrap();

        let latex = render_standings(&table, &ranking, &Season::Year(2009), 2, generated_at);

        let high = latex.find("High\\_Roller").unwrap();
        let low = latex.find("Low \\& Co").unwrap();
        assert!(high < low);
        assert!(latex.starts_with("% Generated by playoff-points"));
        assert!(latex.contains("2017-02-06 12:00:00 UTC"));
    }

    #[test]
    fn test_standings_cells_and_caption() {
        let table = create_test_table();
        let ranking = ParticipantRanking::from_totals(&table);
        let latex = generate_latex_standings(&table, &ranking, &Season::Year(2009), 2);

        assert!(latex.contains("\\begin{tabular}{l r r r}"));
        assert!(latex.contains("Participant & Wildcard & Division & Total \\\\"));
        assert!(latex.contains("High\\_Roller & 4 & 2.5 & 6.5 \\\\"));
        assert!(latex.contains("Low \\& Co & 1 & -- & 1 \\\\"));
        assert!(latex.contains("\\caption{Standings for 2009 after Division}"));
        assert!(latex.contains("\\label{tab:standings-2009-round2}"));
    }

    #[test]
    fn test_make_latex_file_writes_round_file() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource(create_test_table());

        let path = make_latex_file(&source, &Season::Year(2009), 1, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("2009").join("round1.tex"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Participant & Wildcard & Total"));
        assert!(!content.contains("Division"));
    }

    #[test]
    fn test_make_latex_file_rejects_round_zero() {
        let dir = TempDir::new().unwrap();
        let source = FixedSource(create_test_table());
        let err = make_latex_file(&source, &Season::Year(2009), 0, dir.path()).unwrap_err();
        assert!(matches!(err, ChartError::InvalidRoundLimit(_)));
    }
}
