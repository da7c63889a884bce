//! Writing figures to disk as PDF, SVG and PNG.
//!
//! The PDF is converted from the same SVG document that is saved next to it.

use super::draw::{draw_figure, Layout};
use super::figure::Figure;
use super::RenderConfig;
use crate::error::{ChartError, Result};
use crate::models::Season;
use image::{ImageError, ImageFormat, RgbImage, RgbaImage};
use plotters::prelude::*;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use svg2pdf::usvg;
use tracing::{debug, info};

/// SVG user units per inch.
const SVG_UNITS_PER_INCH: f64 = 72.0;

/// Paths written for one saved chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedChart {
    /// `<base>.pdf`
    pub vector: PathBuf,
    /// `<base>.svg`, the document the PDF was converted from.
    pub svg: PathBuf,
    /// `<base>.png`
    pub raster: PathBuf,
}

/// `<figures_root>/<season>`.
pub fn figure_dir(figures_root: &Path, season: &Season) -> PathBuf {
    figures_root.join(season.dir_name())
}

/// Where `figure` is saved for `season`.
pub fn output_paths(figure: &Figure, season: &Season, figures_root: &Path) -> SavedChart {
    let dir = figure_dir(figures_root, season);
    let base = figure.base_name();
    SavedChart {
        vector: dir.join(format!("{}.pdf", base)),
        svg: dir.join(format!("{}.svg", base)),
        raster: dir.join(format!("{}.png", base)),
    }
}

/// Save `figure` as PDF, SVG and PNG, replacing earlier copies.
pub fn save_figure(
    figure: &Figure,
    season: &Season,
    config: &RenderConfig,
    figures_root: &Path,
) -> Result<SavedChart> {
    let paths = output_paths(figure, season, figures_root);
    let dir = figure_dir(figures_root, season);
    fs::create_dir_all(&dir).map_err(|e| {
        ChartError::io(
            format!("Failed to create figure directory {}", dir.display()),
            e,
        )
    })?;

    let layout = Layout::for_figure(figure, config);

    let svg = with_panic_guard("SVG rendering", || render_svg(figure, config, &layout))?;
    fs::write(&paths.svg, &svg)
        .map_err(|e| ChartError::io(format!("Failed to write {}", paths.svg.display()), e))?;
    debug!("Wrote {}", paths.svg.display());

    let pdf = with_panic_guard("PDF conversion", || svg_to_pdf(&svg))?;
    fs::write(&paths.vector, pdf).map_err(|e| {
        ChartError::io(format!("Failed to write {}", paths.vector.display()), e)
    })?;
    debug!("Wrote {}", paths.vector.display());

    with_panic_guard("PNG rendering", || {
        write_png(figure, config, &layout, &paths.raster)
    })?;
    debug!("Wrote {}", paths.raster.display());

    info!(
        "Saved '{}' to {}",
        figure.title,
        dir.display()
    );
    Ok(paths)
}

fn render_svg(figure: &Figure, config: &RenderConfig, layout: &Layout) -> Result<String> {
    let mut svg = String::new();
    {
        let size = layout.pixel_size(SVG_UNITS_PER_INCH);
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        let background = if config.transparent { None } else { Some(WHITE) };
        draw_figure(&root, figure, config, layout, SVG_UNITS_PER_INCH, background)?;
        root.present()
            .map_err(|e| ChartError::Render(e.to_string()))?;
    }
    Ok(svg)
}

/// Convert an SVG document to a single-page PDF sized to the drawing.
fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| ChartError::Render(format!("cannot parse chart SVG: {}", e)))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| ChartError::Render(format!("cannot convert chart to PDF: {}", e)))
}

fn write_png(figure: &Figure, config: &RenderConfig, layout: &Layout, path: &Path) -> Result<()> {
    let px_per_in = f64::from(config.dpi);
    let (width, height) = layout.pixel_size(px_per_in);
    let mut buffer = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(&root, figure, config, layout, px_per_in, Some(WHITE))?;
        root.present()
            .map_err(|e| ChartError::Render(e.to_string()))?;
    }

    let saved = if config.transparent {
        let rgba = key_out_white(&buffer);
        RgbaImage::from_raw(width, height, rgba)
            .ok_or_else(|| ChartError::Render("PNG buffer has the wrong size".to_string()))?
            .save_with_format(path, ImageFormat::Png)
    } else {
        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Render("PNG buffer has the wrong size".to_string()))?
            .save_with_format(path, ImageFormat::Png)
    };

    saved.map_err(|e| match e {
        ImageError::IoError(source) => {
            ChartError::io(format!("Failed to write {}", path.display()), source)
        }
        other => ChartError::Render(other.to_string()),
    })
}

/// Expand RGB pixels to RGBA, making pure white fully transparent.
fn key_out_white(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for pixel in rgb.chunks_exact(3) {
        rgba.extend_from_slice(pixel);
        rgba.push(if pixel == [255, 255, 255] { 0 } else { 255 });
    }
    rgba
}

/// Run a plotting closure, converting a backend panic into a render error.
fn with_panic_guard<T>(what: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let prev_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let outcome = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(prev_hook);

    outcome.unwrap_or_else(|_| {
        Err(ChartError::Render(format!(
            "{} panicked inside the plotting backend (missing font support?)",
            what
        )))
    })
}
