//! logscope -- chunked log classifier with cross-file aggregation.
//!
//! Parses the command line, loads `logscope.toml` (optional), installs the
//! tracing subscriber and dispatches to a subcommand handler. Errors are
//! printed to stderr and mapped to exit codes by [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use logscope_core::config::{GeneralConfig, LogscopeConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config validate` reports a broken file itself, so loading must not fail early here
    let loaded = LogscopeConfig::load_or_default(&cli.config).await;
    let general = loaded
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_else(|_| GeneralConfig::default());

    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Logging(e.to_string()))?;

    tracing::debug!(config = %cli.config.display(), "logscope starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Analyze(args) => {
            let config = loaded?;
            commands::analyze::execute(args, &config, &writer).await
        }
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}
