use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sample grids at IPF points and join point time series.
#[derive(Parser)]
#[command(
    name = "ipftools",
    version,
    about = "Point-to-grid sampling, residual statistics and time-series joins for IPF files"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Sample one or more grids at the points of an IPF file.
    Sample(SampleArgs),
    /// Join two IPF files on a key column, joining their time series.
    Join(JoinArgs),
}

/// Arguments for the `sample` subcommand.
#[derive(clap::Args)]
pub struct SampleArgs {
    /// Input IPF point file.
    #[arg(short, long)]
    pub points: PathBuf,

    /// Grid files (IDF or ASC), sampled in order.
    #[arg(short, long, required = true, num_args = 1..)]
    pub grid: Vec<PathBuf>,

    /// Directory for the sampled IPF files.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interpolate bilinearly between cell centres.
    #[arg(long)]
    pub interpolate: bool,

    /// Drop points outside the grid extent.
    #[arg(long)]
    pub skip_outside: bool,

    /// Drop points on NoData cells.
    #[arg(long)]
    pub skip_nodata: bool,

    /// Observation column, by name or 1-based index.
    #[arg(long)]
    pub observation: Option<String>,

    /// NoData value for observations and output (default: the grid's).
    #[arg(long)]
    pub nodata: Option<f64>,

    /// Decimals written for sampled values and residuals.
    #[arg(long)]
    pub decimals: Option<usize>,

    /// CSV report that receives one statistics row per grid.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Comma-separated percentiles for the report, e.g. "10,50,90".
    #[arg(long)]
    pub pvalues: Option<String>,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// Arguments for the `join` subcommand.
#[derive(clap::Args)]
pub struct JoinArgs {
    /// Left IPF point file; its column layout is kept.
    #[arg(short, long)]
    pub left: PathBuf,

    /// Right IPF point file.
    #[arg(short, long)]
    pub right: PathBuf,

    /// Key column, by name or 1-based index.
    #[arg(short, long)]
    pub key: String,

    /// Key column in the right file (default: same as --key).
    #[arg(long)]
    pub right_key: Option<String>,

    /// Output IPF file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Join type: inner, left, right, full or natural.
    #[arg(short = 't', long)]
    pub join_type: Option<String>,

    /// First date taken into account (yyyymmdd).
    #[arg(long)]
    pub period_start: Option<String>,

    /// Last date taken into account (yyyymmdd).
    #[arg(long)]
    pub period_end: Option<String>,

    /// Largest gap in days that is still interpolated.
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Interpolate right-hand time series at left-hand dates.
    #[arg(long)]
    pub interpolate: bool,
}
