/// CLI argument definitions via clap derive.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::analysis::InterfaceKind;

/// broccoli-run — configure and run BROCCOLI fMRI analyses.
#[derive(Debug, Parser)]
#[command(
    name = "broccoli-run",
    about = "Configure and run BROCCOLI fMRI analyses from the CLI",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, global = true, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, global = true, conflicts_with = "output")]
    pub json: bool,

    /// Omit table headers.
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Debug logging and step timing on stderr (RUST_LOG overrides).
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file (default: <config dir>/broccoli-run/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// BROCCOLI installation directory. Overrides BROCCOLI_DIR.
    #[arg(long, global = true, value_name = "DIR")]
    pub broccoli_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON object (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Key/value table (human-readable).
    Table,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a first-level GLM analysis.
    Firstlevel(FirstLevelArgs),
    /// Run an independent component analysis.
    Ica(IcaArgs),
    /// Run the analysis described in a TOML request file.
    Run(RunArgs),
    /// Print the inputs and outputs of an interface.
    Describe(DescribeArgs),
    /// Check the BROCCOLI installation and tool binaries.
    Check,
}

/// Flags shared by every command that executes a tool.
#[derive(Debug, Clone, Args)]
pub struct ExecFlags {
    /// Print the interface help text before running.
    #[arg(long)]
    pub show_help: bool,

    /// Skip local input checks and let the tool report problems.
    #[arg(long)]
    pub no_validate: bool,

    /// Print the command line without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Let the tool write directly to the terminal instead of capturing output.
    #[arg(long)]
    pub stream: bool,
}

/// Arguments for `broccoli-run firstlevel`.
#[derive(Debug, Args)]
pub struct FirstLevelArgs {
    /// MNI template volume.
    #[arg(long, value_name = "PATH")]
    pub mni_file: PathBuf,

    /// Filters for parametric registration.
    #[arg(long, value_name = "PATH")]
    pub filters_parametric: PathBuf,

    /// Filters for non-parametric registration.
    #[arg(long, value_name = "PATH")]
    pub filters_nonparametric: PathBuf,

    /// Anatomical T1 volume.
    #[arg(long, value_name = "PATH")]
    pub t1_file: PathBuf,

    /// Functional (BOLD) volume.
    #[arg(long, value_name = "PATH")]
    pub fmri_file: PathBuf,

    /// Directory with GLM onset files.
    #[arg(long, value_name = "DIR")]
    pub glm_path: PathBuf,

    /// OpenCL platform (default from config, else 0).
    #[arg(long, value_name = "N")]
    pub opencl_platform: Option<u32>,

    /// OpenCL device (default from config, else 0).
    #[arg(long, value_name = "N")]
    pub opencl_device: Option<u32>,

    /// Output base name (default: fMRI file name).
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Tell the tool not to print anything.
    #[arg(long)]
    pub quiet: bool,

    /// Tell the tool to print timing details.
    #[arg(long)]
    pub verbose: bool,

    #[command(flatten)]
    pub exec: ExecFlags,
}

/// Arguments for `broccoli-run ica`.
#[derive(Debug, Args)]
pub struct IcaArgs {
    /// fMRI volume to decompose.
    pub input: PathBuf,

    /// OpenCL platform (default from config, else 0).
    #[arg(long, value_name = "N")]
    pub opencl_platform: Option<u32>,

    /// OpenCL device (default from config, else 0).
    #[arg(long, value_name = "N")]
    pub opencl_device: Option<u32>,

    /// Smooth data before ICA, FWHM in mm.
    #[arg(long, value_name = "MM")]
    pub smoothing: Option<f32>,

    /// Apply motion correction before ICA.
    #[arg(long)]
    pub motion_correction: bool,

    /// Percent of variance to keep before ICA.
    #[arg(long, value_name = "PERCENT", default_value_t = crate::analysis::request::DEFAULT_ICA_VARIANCE)]
    pub variance: f64,

    /// Spatial mask volume.
    #[arg(long, value_name = "PATH")]
    pub mask: Option<PathBuf>,

    /// Z-score each time series before ICA.
    #[arg(long)]
    pub zscore: bool,

    /// Output file (default: <input>_ica.nii).
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Tell the tool not to print anything.
    #[arg(long)]
    pub quiet: bool,

    /// Tell the tool to print timing details.
    #[arg(long)]
    pub verbose: bool,

    /// Enable the tool's own debug output.
    #[arg(long)]
    pub tool_debug: bool,

    #[command(flatten)]
    pub exec: ExecFlags,
}

/// Arguments for `broccoli-run run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// TOML request file.
    pub request: PathBuf,

    #[command(flatten)]
    pub exec: ExecFlags,
}

/// Arguments for `broccoli-run describe`.
#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Interface to describe.
    pub interface: InterfaceKind,
}
