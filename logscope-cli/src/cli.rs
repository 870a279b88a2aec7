//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use logscope_analyzer::PreviewScope;

/// logscope -- chunked log classifier with cross-file aggregation.
///
/// Use `logscope <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logscope", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logscope.toml configuration file (optional).
    #[arg(short, long, default_value = "logscope.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one or more log files as a single job.
    Analyze(AnalyzeArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Classify every line of the given files and print the merged summary.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Log files to analyze, processed in the given order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Preview scope.
    #[arg(long, value_enum, default_value = "all")]
    pub filter: ScopeArg,

    /// Case-insensitive substring the preview lines must contain.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Maximum number of preview lines to print.
    #[arg(long, default_value_t = 20)]
    pub preview: usize,

    /// Export the filtered preview to this CSV file.
    #[arg(long, conflicts_with = "csv_dir")]
    pub csv: Option<PathBuf>,

    /// Export the filtered preview into this directory as `log_preview_<millis>.csv`.
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,

    /// Override the chunk size (lines per snapshot).
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Year applied to syslog timestamps that carry none.
    #[arg(long)]
    pub reference_year: Option<i32>,
}

/// Preview scope accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Every sampled line.
    All,
    /// Error-level lines only.
    Error,
    /// Warn-level lines only.
    Warn,
    /// Lines matching a threat keyword.
    Threat,
}

impl From<ScopeArg> for PreviewScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => Self::All,
            ScopeArg::Error => Self::Error,
            ScopeArg::Warn => Self::Warn,
            ScopeArg::Threat => Self::Threat,
        }
    }
}

// ---- config ----

/// Manage logscope configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, analyzer).
        #[arg(long)]
        section: Option<String>,
    },
}
