//! Stacked bar chart rendering.
//!
//! A chart is produced in two steps: [`figure::build_figure`] lays the
//! ranked table out as a [`Figure`], then [`save::save_figure`] draws it
//! with plotters into a PDF document and a PNG image.

pub mod draw;
pub mod figure;
pub mod palette;
pub mod save;

pub use figure::{build_figure, Figure};
pub use save::SavedChart;

use crate::config::RenderSettings;
use crate::error::Result;
use crate::models::{ParticipantRanking, PointsTable, Season};
use std::path::PathBuf;
use tracing::info;

/// Fonts and physical size of rendered charts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Font family name; `serif`, `sans-serif` and `monospace` are generic.
    pub family: String,
    /// Font size in points.
    pub size: f64,
    /// Raster resolution.
    pub dpi: u32,
    /// Width of the bar area in inches.
    pub plot_width_in: f64,
    /// Height of one participant's row in inches.
    pub row_height_in: f64,
    /// Leave the background unpainted.
    pub transparent: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from(&RenderSettings::default())
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            family: settings.family.clone(),
            size: settings.size,
            dpi: settings.dpi,
            plot_width_in: settings.plot_width_in,
            row_height_in: settings.row_height_in,
            transparent: settings.transparent,
        }
    }
}

/// A chart built by [`ChartRenderer::render_chart`].
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub figure: Figure,
    /// Files written, when saving was requested.
    pub saved: Option<SavedChart>,
}

/// Renders points charts with a fixed configuration.
pub struct ChartRenderer {
    config: RenderConfig,
    figures_root: PathBuf,
}

impl ChartRenderer {
    pub fn new(config: RenderConfig, figures_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            figures_root: figures_root.into(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Lay out the chart for a ranked table, optionally save it, then
    /// display it on an interactive terminal.
    pub fn render_chart(
        &self,
        table: &PointsTable,
        ranking: &ParticipantRanking,
        season: &Season,
        save: bool,
    ) -> Result<RenderedChart> {
        let figure = build_figure(table, ranking, season)?;

        let saved = if save {
            let saved = save::save_figure(&figure, season, &self.config, &self.figures_root)?;
            info!(
                "Chart '{}' written to {} and {}",
                figure.title,
                saved.vector.display(),
                saved.raster.display()
            );
            Some(saved)
        } else {
            None
        };

        figure.display();
        Ok(RenderedChart { figure, saved })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use tempfile::TempDir;

    fn season_2009() -> (PointsTable, ParticipantRanking) {
        let mut table = PointsTable::new(
            ["Wildcard", "Division", "Conference"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        table
            .push_participant_summed("First", vec![Some(5.0), Some(3.0), Some(2.0)])
            .unwrap();
        table
            .push_participant_summed("Second", vec![Some(0.0), Some(0.0), Some(0.0)])
            .unwrap();
        let ranking = ParticipantRanking::from_totals(&table);
        (table.reindex(&ranking).unwrap(), ranking)
    }

    #[test]
    fn test_default_render_config() {
        let config = RenderConfig::default();
        assert_eq!(config.family, "serif");
        assert_eq!(config.size, 12.0);
        assert_eq!(config.dpi, 300);
        assert!(config.transparent);
    }

    #[test]
    fn test_render_without_saving_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let renderer = ChartRenderer::new(RenderConfig::default(), dir.path());
        let (table, ranking) = season_2009();

        let rendered = renderer
            .render_chart(&table, &ranking, &Season::Year(2009), false)
            .unwrap();

        assert!(rendered.saved.is_none());
        assert!(!dir.path().join("2009").exists());
        let first_row = rendered
            .figure
            .participants
            .iter()
            .position(|p| p == "First")
            .unwrap();
        let label = rendered.figure.total_label(first_row).unwrap();
        assert_eq!(label.x, 10.0 + rendered.figure.max_total / 25.0);
    }

    #[test]
    fn test_render_and_save_season_2009() {
        let dir = TempDir::new().unwrap();
        let config = RenderConfig {
            dpi: 50,
            ..RenderConfig::default()
        };
        let renderer = ChartRenderer::new(config, dir.path());
        let (table, ranking) = season_2009();

        let rendered = renderer
            .render_chart(&table, &ranking, &Season::Year(2009), true)
            .unwrap();

        let saved = rendered.saved.unwrap();
        assert_eq!(saved.vector, dir.path().join("2009").join("Points-2009.pdf"));
        assert_eq!(saved.raster, dir.path().join("2009").join("Points-2009.png"));
        assert!(saved.vector.exists());
        assert!(saved.raster.exists());
    }

    #[test]
    fn test_render_rejects_empty_table() {
        let renderer = ChartRenderer::new(RenderConfig::default(), "figures");
        let table = PointsTable::new(vec!["Wildcard".to_string()]);
        let err = renderer
            .render_chart(&table, &ParticipantRanking::default(), &Season::Year(2009), true)
            .unwrap_err();
        assert!(matches!(err, ChartError::Render(_)));
    }
}
