//! Plotters drawing of a laid out [`Figure`].

use super::figure::{Figure, BAR_HEIGHT};
use super::palette::Rgb;
use super::RenderConfig;
use crate::error::{ChartError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_EM: f64 = 0.55;

/// Points per inch; font sizes are given in points.
const POINTS_PER_INCH: f64 = 72.0;

const PADDING_IN: f64 = 0.15;

/// Physical size of the figure's regions, in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub label_width_in: f64,
    pub plot_width_in: f64,
    pub legend_width_in: f64,
    pub legend_height_in: f64,
    pub rows_height_in: f64,
    pub header_in: f64,
    pub footer_in: f64,
}

impl Layout {
    pub fn for_figure(figure: &Figure, config: &RenderConfig) -> Self {
        let em_in = config.size / POINTS_PER_INCH;
        let longest_name = figure
            .participants
            .iter()
            .map(|n| n.chars().count())
            .max()
            .unwrap_or(0);
        let longest_round = figure
            .legend
            .iter()
            .map(|e| e.round.chars().count())
            .max()
            .unwrap_or(0);

        let legend_width_in = if figure.legend.is_empty() {
            0.0
        } else {
            longest_round as f64 * em_in * CHAR_WIDTH_EM + 2.0 * em_in + 3.0 * PADDING_IN
        };

        Self {
            label_width_in: longest_name as f64 * em_in * CHAR_WIDTH_EM + 2.0 * PADDING_IN,
            plot_width_in: config.plot_width_in,
            legend_width_in,
            legend_height_in: figure.legend.len() as f64 * em_in * 1.6 + 2.0 * PADDING_IN,
            rows_height_in: figure.participants.len() as f64 * config.row_height_in,
            header_in: em_in * 2.0 + PADDING_IN,
            footer_in: PADDING_IN,
        }
    }

    pub fn width_in(&self) -> f64 {
        self.label_width_in + self.plot_width_in + self.legend_width_in + PADDING_IN
    }

    pub fn height_in(&self) -> f64 {
        (self.header_in + self.rows_height_in + self.footer_in).max(self.legend_height_in)
    }

    /// Canvas size in pixels at the given resolution.
    pub fn pixel_size(&self, px_per_in: f64) -> (u32, u32) {
        (
            to_px(self.width_in(), px_per_in).max(1),
            to_px(self.height_in(), px_per_in).max(1),
        )
    }
}

fn to_px(inches: f64, px_per_in: f64) -> u32 {
    (inches * px_per_in).round().max(0.0) as u32
}

fn render_err(err: impl Display) -> ChartError {
    ChartError::Render(err.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Draw `figure` onto `root`, which must be sized from `layout`.
///
/// `background` fills the whole canvas first; `None` leaves it untouched.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    config: &RenderConfig,
    layout: &Layout,
    px_per_in: f64,
    background: Option<RGBColor>,
) -> Result<()> {
    if let Some(color) = background {
        root.fill(&color).map_err(render_err)?;
    }

    let font_px = config.size * px_per_in / POINTS_PER_INCH;
    let family = FontFamily::from(config.family.as_str());
    let text = |size: f64, pos: Pos| {
        FontDesc::new(family, size, FontStyle::Normal)
            .color(&BLACK)
            .pos(pos)
    };
    let centered = text(font_px, Pos::new(HPos::Center, VPos::Center));

    let legend_px = to_px(layout.legend_width_in, px_per_in) as i32;
    let (width_px, _) = root.dim_in_pixel();
    let (chart_area, legend_area) = root.split_horizontally(width_px as i32 - legend_px);

    let rows = figure.participants.len() as f64;
    let mut chart = ChartBuilder::on(&chart_area)
        .caption(
            &figure.title,
            FontDesc::new(family, font_px * 1.2, FontStyle::Normal),
        )
        .margin_top(to_px(PADDING_IN, px_per_in))
        .margin_bottom(to_px(layout.footer_in, px_per_in))
        .margin_right(to_px(PADDING_IN, px_per_in))
        .set_label_area_size(
            LabelAreaPosition::Left,
            to_px(layout.label_width_in, px_per_in),
        )
        .build_cartesian_2d(0f64..figure.x_limit, -0.5f64..(rows - 0.5))
        .map_err(render_err)?;

    let half = BAR_HEIGHT / 2.0;
    chart
        .draw_series(figure.segments.iter().map(|s| {
            let y = s.row as f64;
            Rectangle::new(
                [(s.left, y - half), (s.left + s.width, y + half)],
                rgb(s.color).filled(),
            )
        }))
        .map_err(render_err)?;
    chart
        .draw_series(figure.segments.iter().map(|s| {
            let y = s.row as f64;
            Rectangle::new(
                [(s.left, y - half), (s.left + s.width, y + half)],
                BLACK.stroke_width(1),
            )
        }))
        .map_err(render_err)?;

    // Only the left spine is visible.
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, -0.5), (0.0, rows - 0.5)],
            BLACK.stroke_width(1),
        )))
        .map_err(render_err)?;

    for annotation in &figure.annotations {
        let pos = chart.backend_coord(&(annotation.x, annotation.row as f64));
        root.draw(&Text::new(
            annotation.text.as_str(),
            pos,
            centered.clone(),
        ))
        .map_err(render_err)?;
    }

    let name_style = text(font_px, Pos::new(HPos::Right, VPos::Center));
    let gap = to_px(PADDING_IN / 2.0, px_per_in) as i32;
    for (row, name) in figure.participants.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(0.0, row as f64));
        root.draw(&Text::new(name.as_str(), (x - gap, y), name_style.clone()))
            .map_err(render_err)?;
    }

    // The legend area spans the full canvas height, so backend rows line up with it.
    let (_, plot_top) = chart.backend_coord(&(0.0, rows - 0.5));
    let (_, plot_bottom) = chart.backend_coord(&(0.0, -0.5));
    draw_legend(
        &legend_area,
        figure,
        layout,
        (plot_top, plot_bottom),
        font_px,
        px_per_in,
        &text,
    )
}

/// Top edge of a legend frame centered between the plot's top and bottom rows.
fn legend_top(plot_top: i32, plot_bottom: i32, frame_height: i32) -> i32 {
    let (upper, lower) = (plot_top.min(plot_bottom), plot_top.max(plot_bottom));
    (upper + lower - frame_height) / 2
}

fn draw_legend<'a, DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
    layout: &Layout,
    (plot_top, plot_bottom): (i32, i32),
    font_px: f64,
    px_per_in: f64,
    text: &impl Fn(f64, Pos) -> TextStyle<'a>,
) -> Result<()> {
    if figure.legend.is_empty() {
        return Ok(());
    }

    let pad = to_px(PADDING_IN, px_per_in) as i32;
    let line = (font_px * 1.6).round() as i32;
    let swatch = font_px.round() as i32;
    let frame_height = to_px(layout.legend_height_in, px_per_in) as i32;
    let frame_width = to_px(layout.legend_width_in, px_per_in) as i32 - pad;
    let top = legend_top(plot_top, plot_bottom, frame_height).max(0);

    area.draw(&Rectangle::new(
        [(0, top), (frame_width, top + frame_height)],
        BLACK.stroke_width(1),
    ))
    .map_err(render_err)?;

    let label = text(font_px, Pos::new(HPos::Left, VPos::Center));
    for (idx, entry) in figure.legend.iter().enumerate() {
        let center_y = top + pad + idx as i32 * line + line / 2;
        let swatch_box = [
            (pad, center_y - swatch / 2),
            (pad + swatch, center_y + swatch / 2),
        ];
        area.draw(&Rectangle::new(swatch_box, rgb(entry.color).filled()))
            .map_err(render_err)?;
        area.draw(&Rectangle::new(swatch_box, BLACK.stroke_width(1)))
            .map_err(render_err)?;
        area.draw(&Text::new(
            entry.round.as_str(),
            (2 * pad + swatch, center_y),
            label.clone(),
        ))
        .map_err(render_err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::figure::build_figure;
    use crate::models::{ParticipantRanking, PointsTable, Season};

    fn figure(names: &[&str], rounds: &[&str]) -> Figure {
        let mut table = PointsTable::new(rounds.iter().map(|r| r.to_string()).collect());
        for name in names {
            table
                .push_participant_summed(*name, vec![Some(1.0); rounds.len()])
                .unwrap();
        }
        let ranking = ParticipantRanking::from_totals(&table);
        build_figure(&table, &ranking, &Season::Year(2009)).unwrap()
    }

    #[test]
    fn test_layout_grows_with_rows() {
        let config = RenderConfig::default();
        let small = Layout::for_figure(&figure(&["A"], &["Wildcard"]), &config);
        let large = Layout::for_figure(&figure(&["A", "B", "C", "D"], &["Wildcard"]), &config);

        assert_eq!(large.rows_height_in, 4.0 * config.row_height_in);
        assert!(large.height_in() > small.height_in());
    }

    #[test]
    fn test_layout_reserves_room_for_long_names() {
        let config = RenderConfig::default();
        let short = Layout::for_figure(&figure(&["Al"], &["Wildcard"]), &config);
        let long = Layout::for_figure(&figure(&["Bartholomew Longname"], &["Wildcard"]), &config);
        assert!(long.label_width_in > short.label_width_in);
        assert!(long.width_in() > short.width_in());
    }

    #[test]
    fn test_pixel_size_scales_with_resolution() {
        let config = RenderConfig::default();
        let layout = Layout::for_figure(&figure(&["A", "B"], &["Wildcard", "Conference"]), &config);

        let (w72, h72) = layout.pixel_size(72.0);
        let (w300, h300) = layout.pixel_size(300.0);
        assert!(w300 > w72 * 4);
        assert!(h300 > h72 * 4);
    }

    #[test]
    fn test_legend_centered_on_plot_rows() {
        // Header of 40px, plot rows from 40 to 240, frame 60px tall.
        assert_eq!(legend_top(40, 240, 60), 110);
        // Pixel rows grow downwards, so the top row may map below the bottom one.
        assert_eq!(legend_top(240, 40, 60), 110);
    }

    #[test]
    fn test_legend_ignores_title_header() {
        let config = RenderConfig::default();
        let layout = Layout::for_figure(&figure(&["A", "B", "C"], &["Wildcard"]), &config);
        let px_per_in = 100.0;
        let header = to_px(layout.header_in, px_per_in) as i32;
        let rows = to_px(layout.rows_height_in, px_per_in) as i32;
        let frame = to_px(layout.legend_height_in, px_per_in) as i32;
        let (_, height) = layout.pixel_size(px_per_in);

        let top = legend_top(header, header + rows, frame);
        assert!(((top + frame / 2) - (header + rows / 2)).abs() <= 1);
        assert!(top > (height as i32 - frame) / 2);
    }
}
