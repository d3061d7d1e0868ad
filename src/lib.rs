//! Attenua - distance truncation for acoustic bird detections.
//!
//! Reclassifies raw acoustic detections as perceptible or not at chosen
//! truncation radii using a fitted sound-attenuation surface, and emits
//! corrected per-site/visit abundance matrices.

#![warn(missing_docs)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod truncation;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use tracing::info;

use cli::{Cli, Command, TruncateArgs};
use config::{Config, config_file_path, load_default_config, save_default_config};
use constants::distance;
use pipeline::PipelineOptions;
use truncation::Resolution;

pub use error::{Error, Result};

/// Main entry point for the attenua CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.truncate.verbose, cli.truncate.quiet);

    // Load configuration
    let config = load_default_config()?;

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, &config);
    }

    // Default: run the truncation pipeline
    run_truncation(&cli.truncate, &config)
}

/// Run the truncation pipeline with the given options.
fn run_truncation(args: &TruncateArgs, config: &Config) -> Result<()> {
    // Show help if no inputs provided
    if args.detections.is_none() && args.amplitude_table.is_none() && args.site_visits.is_none() {
        let _ = Cli::command().print_help();
        std::process::exit(0);
    }

    config::validate_config(config)?;

    let detections = require_input(args.detections.as_ref(), "--detections")?;
    let amplitude_table = require_input(args.amplitude_table.as_ref(), "--amplitude-table")?;
    let site_visits = require_input(args.site_visits.as_ref(), "--site-visits")?;

    // Resolve settings (CLI overrides config)
    let distances = resolve_distances(args, config)?;
    let min_visits = args.min_visits.unwrap_or(config.defaults.min_visits);
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let csv_bom = !args.no_csv_bom && config.defaults.csv_bom;

    info!(
        "Truncating at {} distance(s), {}-{} m",
        distances.len(),
        distances.first().copied().unwrap_or_default(),
        distances.last().copied().unwrap_or_default()
    );

    let options = PipelineOptions {
        detections,
        amplitude_table,
        site_visits,
        output_dir,
        distances,
        min_visits,
        csv_bom,
        show_progress: !args.quiet && !args.no_progress,
    };

    let report = pipeline::run_pipeline(&options, config)?;

    info!(
        "Complete: {} abundance matrices over {} survey occasions, summary at {}",
        report.matrices_written,
        report.universe_size,
        report.summary_path.display()
    );

    Ok(())
}

fn require_input(value: Option<&PathBuf>, flag: &str) -> Result<PathBuf> {
    value.cloned().ok_or_else(|| Error::ConfigValidation {
        message: format!("{flag} is required for a truncation run"),
    })
}

/// Resolve the distance selection: CLI, then config, then the full
/// working range.
fn resolve_distances(args: &TruncateArgs, config: &Config) -> Result<Vec<u32>> {
    if let Some(selection) = &args.distances {
        return Ok(selection.0.clone());
    }
    if let Some(spec) = &config.defaults.distances {
        let selection =
            cli::parse_distance_selection(spec).map_err(|message| Error::InvalidDistanceSpec {
                value: spec.clone(),
                message,
            })?;
        return Ok(selection.0);
    }
    Ok((distance::MIN_M..=distance::MAX_M).collect())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
        Command::Species => {
            handle_species_command(config);
            Ok(())
        }
    }
}

fn handle_config_command(action: cli::ConfigAction) -> Result<()> {
    use cli::ConfigAction;

    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_species_command(config: &Config) {
    let reference = config.reference.to_map();

    println!("Working species:");
    for code in &config.species.working {
        match reference.resolution_for(code) {
            Resolution::Own => println!("  {code}"),
            Resolution::Proxy(proxy) => println!("  {code} (proxy: {proxy})"),
            Resolution::CopyOf(sibling) => println!("  {code} (shares {sibling}'s thresholds)"),
        }
    }
}
