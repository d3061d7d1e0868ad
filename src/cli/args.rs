//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::validators::{DistanceSelection, parse_distance_selection};

/// Distance-truncation of acoustic bird detections.
#[derive(Debug, Parser)]
#[command(name = "attenua")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Common options for truncation runs.
    #[command(flatten)]
    pub truncate: TruncateArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the working species set and its proxy resolutions.
    Species,
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for a truncation run.
#[derive(Debug, Args)]
pub struct TruncateArgs {
    /// Detection table CSV from the annotation platform.
    #[arg(short, long, env = "ATTENUA_DETECTIONS")]
    pub detections: Option<PathBuf>,

    /// Amplitude prediction table CSV from the attenuation model.
    #[arg(short, long, env = "ATTENUA_AMPLITUDE_TABLE")]
    pub amplitude_table: Option<PathBuf>,

    /// Site-visit count table CSV.
    #[arg(short, long, env = "ATTENUA_SITE_VISITS")]
    pub site_visits: Option<PathBuf>,

    /// Output directory (default: current directory).
    #[arg(short, long, env = "ATTENUA_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Truncation distances: a range (30-500) or comma list (50,100,150).
    #[arg(long, value_parser = parse_distance_selection, env = "ATTENUA_DISTANCES")]
    pub distances: Option<DistanceSelection>,

    /// Minimum transcribed visits for a site to enter the analysis.
    #[arg(long, env = "ATTENUA_MIN_VISITS")]
    pub min_visits: Option<u32>,

    /// Skip the UTF-8 BOM in abundance CSVs.
    #[arg(long)]
    pub no_csv_bom: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}
