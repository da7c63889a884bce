//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{RoundLimit, Season};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// playoff-points - playoff pool standings charts
///
/// Import archived playoff pool seasons, rank participants by points and
/// render stacked bar charts and LaTeX standings tables.
///
/// Examples:
///   playoff-points import archives/
///   playoff-points chart --season 2009 --through 2
///   playoff-points latex --season 2016 --round 3
///   playoff-points season --season 2009 --archive archives/2009.toml
///   playoff-points init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .playoff-points.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory of imported season records
    #[arg(long, value_name = "DIR", global = true, env = "PLAYOFF_POINTS_STORE")]
    pub store: Option<PathBuf>,

    /// Root directory for saved charts
    #[arg(long, value_name = "DIR", global = true)]
    pub figures: Option<PathBuf>,

    /// Root directory for LaTeX standings files
    #[arg(long, value_name = "DIR", global = true)]
    pub latex: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Import archival season files into the store
    ///
    /// Directories are searched recursively for .toml files. Importing a
    /// season again replaces its record.
    Import {
        /// Archive files or directories
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// Render the points chart for a season
    Chart {
        /// Season year or label
        #[arg(short, long)]
        season: Season,

        /// Last round to include: a round number or 'champions'
        #[arg(short, long, default_value = "champions", value_name = "ROUND")]
        through: RoundLimit,

        /// Lay out and display the chart without writing files
        #[arg(long)]
        no_save: bool,
    },

    /// Write the LaTeX standings table after a round
    Latex {
        /// Season year or label
        #[arg(short, long)]
        season: Season,

        /// Playoff round number (1-based)
        #[arg(short, long)]
        round: usize,
    },

    /// Produce every chart and LaTeX table for a season
    Season {
        /// Season year or label
        #[arg(short, long)]
        season: Season,

        /// Archive to import before rendering
        #[arg(short, long, value_name = "FILE")]
        archive: Option<PathBuf>,
    },

    /// List seasons in the store
    List,

    /// Generate a default .playoff-points.toml configuration file
    InitConfig,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::Latex { round, .. } = self.command {
            if round == 0 {
                return Err("Round must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the configuration file's default; `--quiet` wins.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
