//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.playoff-points.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".playoff-points.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Chart rendering settings.
    #[serde(default)]
    pub render: RenderSettings,
}

/// Where data is read from and written to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding imported season records.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Root directory for saved charts.
    #[serde(default = "default_figures_dir")]
    pub figures_dir: PathBuf,

    /// Root directory for LaTeX standings files.
    #[serde(default = "default_latex_dir")]
    pub latex_dir: PathBuf,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            figures_dir: default_figures_dir(),
            latex_dir: default_latex_dir(),
            verbose: false,
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("data/store")
}

fn default_figures_dir() -> PathBuf {
    PathBuf::from("figures")
}

fn default_latex_dir() -> PathBuf {
    PathBuf::from("latex")
}

/// Chart fonts, size and output resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Font family for all chart text.
    #[serde(default = "default_family")]
    pub family: String,

    /// Font size in points.
    #[serde(default = "default_size")]
    pub size: f64,

    /// PNG resolution in dots per inch.
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Width of the bar area in inches.
    #[serde(default = "default_plot_width")]
    pub plot_width_in: f64,

    /// Height of each participant's row in inches.
    #[serde(default = "default_row_height")]
    pub row_height_in: f64,

    /// Save charts without a background fill.
    #[serde(default = "default_true")]
    pub transparent: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            family: default_family(),
            size: default_size(),
            dpi: default_dpi(),
            plot_width_in: default_plot_width(),
            row_height_in: default_row_height(),
            transparent: true,
        }
    }
}

fn default_family() -> String {
    "serif".to_string()
}

fn default_size() -> f64 {
    12.0
}

fn default_dpi() -> u32 {
    300
}

fn default_plot_width() -> f64 {
    8.0
}

fn default_row_height() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Directory flags override the file only when given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref store) = args.store {
            self.general.store_dir = store.clone();
        }
        if let Some(ref figures) = args.figures {
            self.general.figures_dir = figures.clone();
        }
        if let Some(ref latex) = args.latex {
            self.general.latex_dir = latex.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
        if args.quiet {
            self.general.verbose = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
