//! Stacked bar chart description.
//!
//! [`build_figure`] lays out every bar segment, label and legend entry in
//! data coordinates. Drawing backends only translate this description to
//! pixels, so the layout rules live here and nowhere else.

use super::palette::{round_color, Rgb};
use crate::analysis::round_totals;
use crate::error::{ChartError, Result};
use crate::models::{format_points, is_conference, ParticipantRanking, PointsTable, Season};
use std::io::IsTerminal;
use tracing::debug;

/// Height of a bar as a fraction of its row.
pub const BAR_HEIGHT: f64 = 0.8;

/// The total label sits `max_total / TOTAL_LABEL_DIVISOR` past the bar.
pub const TOTAL_LABEL_DIVISOR: f64 = 25.0;

/// Headroom on the x axis beyond the largest total.
pub const X_HEADROOM: f64 = 1.02;

/// One round's piece of a participant's bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    /// Row index, 0 at the bottom.
    pub row: usize,
    pub round: String,
    pub left: f64,
    pub width: f64,
    pub color: Rgb,
}

impl BarSegment {
    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// A segment's own value, centered on it.
    Segment,
    /// The participant's total, just past the stacked bar.
    Total,
}

/// Text placed on the chart, centered on `(x, row)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub row: usize,
    pub x: f64,
    pub text: String,
    pub kind: LabelKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub round: String,
    pub color: Rgb,
}

/// A fully laid out points chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    /// Participants bottom to top.
    pub participants: Vec<String>,
    /// Total per participant, aligned with `participants`.
    pub totals: Vec<f64>,
    pub rounds: Vec<String>,
    pub max_total: f64,
    /// Right edge of the x axis.
    pub x_limit: f64,
    pub segments: Vec<BarSegment>,
    pub annotations: Vec<Annotation>,
    pub legend: Vec<LegendEntry>,
}

impl Figure {
    /// Segments of one row, left to right.
    pub fn segments_for(&self, row: usize) -> impl Iterator<Item = &BarSegment> {
        self.segments.iter().filter(move |s| s.row == row)
    }

    /// The total label of one row, if the row has one.
    pub fn total_label(&self, row: usize) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|a| a.row == row && a.kind == LabelKind::Total)
    }

    /// File name stem for saved copies: the title without spaces.
    pub fn base_name(&self) -> String {
        self.title.replace(' ', "")
    }

    /// Plain-text rendition of the standings, leader first.
    pub fn text_table(&self) -> String {
        let name_width = self
            .participants
            .iter()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0)
            .max(11);

        let mut out = String::new();
        out.push_str(&format!("{}\n", self.title));
        out.push_str(&format!("{:<width$}", "Participant", width = name_width));
        for round in &self.rounds {
            out.push_str(&format!("  {:>10}", round));
        }
        out.push_str(&format!("  {:>8}\n", "Total"));

        for row in (0..self.participants.len()).rev() {
            out.push_str(&format!(
                "{:<width$}",
                self.participants[row],
                width = name_width
            ));
            for round in &self.rounds {
                let cell = self
                    .segments_for(row)
                    .find(|s| &s.round == round)
                    .map(|s| format_points(s.width))
                    .unwrap_or_else(|| "-".to_string());
                out.push_str(&format!("  {:>10}", cell));
            }
            out.push_str(&format!("  {:>8}\n", format_points(self.totals[row])));
        }

        out
    }

    /// Show the figure on an interactive terminal; a no-op otherwise.
    pub fn display(&self) {
        if !std::io::stdout().is_terminal() {
            debug!("stdout is not a terminal; skipping display of '{}'", self.title);
            return;
        }
        println!("\n{}", self.text_table());
    }
}

/// Lay out the stacked bar chart for a ranked table.
///
/// Participants are drawn in ranking order from the bottom. Missing round
/// values are skipped without moving the running offset; zero values
/// still produce a (zero-width) segment and a label.
pub fn build_figure(
    table: &PointsTable,
    ranking: &ParticipantRanking,
    season: &Season,
) -> Result<Figure> {
    let rounds = table.rounds().to_vec();
    if rounds.is_empty() {
        return Err(ChartError::Render("points table has no rounds".to_string()));
    }
    if ranking.is_empty() || table.is_empty() {
        return Err(ChartError::Render(
            "points table has no participants".to_string(),
        ));
    }

    let mut columns = Vec::with_capacity(ranking.len());
    for name in ranking.iter() {
        let column = table.column(name).ok_or_else(|| {
            ChartError::Render(format!("ranked participant {} is not in the table", name))
        })?;
        columns.push(column);
    }

    let max_total = table.max_total();
    let total_offset = max_total / TOTAL_LABEL_DIVISOR;

    let mut segments = Vec::new();
    let mut annotations = Vec::new();

    for (row, column) in columns.iter().enumerate() {
        let mut left = 0.0;
        for (round, value) in rounds.iter().zip(&column.points) {
            if let Some(points) = *value {
                let segment = BarSegment {
                    row,
                    round: round.clone(),
                    left,
                    width: points,
                    color: round_color(round),
                };
                annotations.push(Annotation {
                    row,
                    x: segment.center(),
                    text: format_points(points),
                    kind: LabelKind::Segment,
                });
                segments.push(segment);
                left += points;
            }
            if is_conference(round) {
                annotations.push(Annotation {
                    row,
                    x: left + total_offset,
                    text: format_points(column.total),
                    kind: LabelKind::Total,
                });
            }
        }
    }

    let legend = rounds
        .iter()
        .filter(|round| segments.iter().any(|s| &s.round == *round))
        .map(|round| LegendEntry {
            round: round.clone(),
            color: round_color(round),
        })
        .collect();

    let x_limit = if max_total > 0.0 {
        max_total * X_HEADROOM
    } else {
        1.0
    };

    let figure = Figure {
        title: format!("Points - {}", season),
        participants: columns.iter().map(|c| c.name.clone()).collect(),
        totals: columns.iter().map(|c| c.total).collect(),
        rounds,
        max_total,
        x_limit,
        segments,
        annotations,
        legend,
    };

    debug!(
        "Laid out '{}': {} segments, {} legend entries, round totals {:?}",
        figure.title,
        figure.segments.len(),
        figure.legend.len(),
        round_totals(table)
    );

    Ok(figure)
}
