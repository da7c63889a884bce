//! playoff-points - playoff pool standings charts
//!
//! A CLI tool that imports archived playoff pool seasons into a local
//! store, ranks participants by points and renders stacked bar charts and
//! LaTeX standings tables.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (invalid arguments, missing data, rendering, I/O)

mod analysis;
mod archive;
mod chart;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod scoring;
mod store;

use anyhow::{Context, Result};
use chart::{ChartRenderer, RenderConfig};
use cli::{Args, Command};
use config::{Config, DEFAULT_CONFIG_FILE};
use indicatif::{ProgressBar, ProgressStyle};
use models::{RoundLimit, Season};
use scoring::StoreScoring;
use std::path::{Path, PathBuf};
use std::time::Instant;
use store::PointsStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Rounds charted by the season batch, in order.
const SEASON_CHARTS: [RoundLimit; 4] = [
    RoundLimit::Through(1),
    RoundLimit::Through(2),
    RoundLimit::Through(3),
    RoundLimit::Champions,
];

/// Rounds the season batch writes LaTeX standings for.
const SEASON_LATEX_ROUNDS: std::ops::RangeInclusive<usize> = 1..=4;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig = args.command {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let (config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("playoff-points v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match origin {
        ConfigOrigin::File(path) => info!("Loaded config from: {}", path.display()),
        ConfigOrigin::Defaults => debug!("No config file found, using defaults"),
        ConfigOrigin::Invalid(reason) => warn!("Failed to load config: {}", reason),
    }

    if let Err(e) = run(&args, &config) {
        error!("Command failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle init-config: generate a default .playoff-points.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize directories, fonts and resolution.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Where the effective configuration came from.
enum ConfigOrigin {
    File(PathBuf),
    Defaults,
    /// The default file exists but could not be parsed.
    Invalid(String),
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    let (mut config, origin) = if let Some(ref config_path) = args.config {
        // An explicit config path must load
        (
            Config::load(config_path)?,
            ConfigOrigin::File(config_path.clone()),
        )
    } else {
        match Config::load_default() {
            Ok(Some(config)) => (config, ConfigOrigin::File(PathBuf::from(DEFAULT_CONFIG_FILE))),
            Ok(None) => (Config::default(), ConfigOrigin::Defaults),
            Err(e) => (Config::default(), ConfigOrigin::Invalid(format!("{:#}", e))),
        }
    };

    config.merge_with_args(args);
    Ok((config, origin))
}

/// Dispatch the selected subcommand.
fn run(args: &Args, config: &Config) -> Result<()> {
    let store = PointsStore::open(&config.general.store_dir);
    let renderer = ChartRenderer::new(
        RenderConfig::from(&config.render),
        &config.general.figures_dir,
    );
    debug!("Render settings: {:?}", renderer.config());

    match &args.command {
        Command::Import { paths } => run_import(paths, &store),
        Command::Chart {
            season,
            through,
            no_save,
        } => run_chart(season, *through, !*no_save, &store, &renderer),
        Command::Latex { season, round } => {
            let path = report::make_latex_file(
                &StoreScoring::new(&store),
                season,
                *round,
                &config.general.latex_dir,
            )
            .with_context(|| format!("Failed to write LaTeX standings for season {}", season))?;
            println!("📝 LaTeX standings saved to: {}", path.display());
            Ok(())
        }
        Command::Season { season, archive } => run_season(
            season,
            archive.as_deref(),
            args.quiet,
            &store,
            &renderer,
            &config.general.latex_dir,
        ),
        Command::List => run_list(&store),
        // Handled before configuration is loaded
        Command::InitConfig => Ok(()),
    }
}

fn run_import(paths: &[PathBuf], store: &PointsStore) -> Result<()> {
    let mut archives = Vec::new();
    for path in paths {
        let found = archive::discover_archives(path)
            .with_context(|| format!("Failed to find archives in {}", path.display()))?;
        if found.is_empty() {
            warn!("No .toml archives found in {}", path.display());
        }
        archives.extend(found);
    }

    if archives.is_empty() {
        anyhow::bail!("No archives to import");
    }

    println!("📥 Importing {} archive(s)...", archives.len());
    for path in &archives {
        let summary = archive::import_archive(path, store)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        println!(
            "   Season {}: {} participants, {} rounds -> {}",
            summary.season,
            summary.participants,
            summary.rounds,
            summary.record_path.display()
        );
    }

    println!("\n✅ Import complete.");
    Ok(())
}

fn run_chart(
    season: &Season,
    limit: RoundLimit,
    save: bool,
    store: &PointsStore,
    renderer: &ChartRenderer,
) -> Result<()> {
    let scoring = StoreScoring::new(store);
    let (table, ranking) = analysis::build_ranked_table(&scoring, season, limit)
        .with_context(|| format!("Failed to rank season {}", season))?;

    let rendered = renderer
        .render_chart(&table, &ranking, season, save)
        .with_context(|| format!("Failed to render chart for season {}", season))?;

    println!("📊 {}", rendered.figure.title);
    println!("   Participants: {}", rendered.figure.participants.len());
    println!("   Rounds: {}", rendered.figure.rounds.join(", "));
    if let Some(saved) = rendered.saved {
        println!("   Vector: {}", saved.vector.display());
        println!("   SVG:    {}", saved.svg.display());
        println!("   Raster: {}", saved.raster.display());
    }
    Ok(())
}

/// Import (optionally), chart every playoff stage and write LaTeX for every round.
fn run_season(
    season: &Season,
    archive_path: Option<&Path>,
    quiet: bool,
    store: &PointsStore,
    renderer: &ChartRenderer,
    latex_root: &Path,
) -> Result<()> {
    let start_time = Instant::now();

    if let Some(path) = archive_path {
        let summary = archive::import_archive(path, store)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        if &summary.season != season {
            warn!(
                "Archive {} holds season {}, not {}",
                path.display(),
                summary.season,
                season
            );
        }
        println!(
            "📥 Imported season {} from {}",
            summary.season,
            path.display()
        );
    }

    let steps = (SEASON_CHARTS.len() + SEASON_LATEX_ROUNDS.count()) as u64;
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(steps)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let scoring = StoreScoring::new(store);
    let mut written = Vec::new();

    for limit in SEASON_CHARTS {
        pb.set_message(format!("chart through {}", limit));
        let (table, ranking) = analysis::build_ranked_table(&scoring, season, limit)
            .with_context(|| format!("Failed to rank season {} through {}", season, limit))?;
        let rendered = renderer
            .render_chart(&table, &ranking, season, true)
            .with_context(|| format!("Failed to render chart through {}", limit))?;
        if let Some(saved) = rendered.saved {
            // Partial charts share a file name
            for path in [saved.vector, saved.svg, saved.raster] {
                if !written.contains(&path) {
                    written.push(path);
                }
            }
        }
        pb.inc(1);
    }

    for round in SEASON_LATEX_ROUNDS {
        pb.set_message(format!("LaTeX round {}", round));
        let path = report::make_latex_file(&scoring, season, round, latex_root)
            .with_context(|| format!("Failed to write LaTeX standings for round {}", round))?;
        written.push(path);
        pb.inc(1);
    }

    pb.finish_and_clear();

    println!("\n📊 Season {} complete:", season);
    for path in &written {
        println!("   {}", path.display());
    }
    println!("   Duration: {:.1}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

fn run_list(store: &PointsStore) -> Result<()> {
    let seasons = store
        .seasons()
        .with_context(|| format!("Failed to list store {}", store.root().display()))?;

    if seasons.is_empty() {
        println!("No seasons in {}", store.root().display());
        return Ok(());
    }

    println!("Seasons in {}:", store.root().display());
    for season in &seasons {
        match store.load(season)? {
            Some(record) => println!(
                "   {} ({} participants, rounds: {}, imported {})",
                season,
                record.participants.len(),
                record.rounds.join(", "),
                record.imported_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => println!("   {}", season),
        }
    }
    Ok(())
}
