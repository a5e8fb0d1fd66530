#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! broccoli-run — configure and run BROCCOLI fMRI analyses.

mod analysis;
mod broccoli;
mod cli;
mod commands;
mod config;
mod tracing_setup;
mod types;

use clap::Parser;

use analysis::AnalysisError;
use cli::{Cli, OutputCtx, write_error};
use config::{Config, Settings};
use tracing_setup::{TracingConfig, init_tracing};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(TracingConfig { debug: cli.debug }) {
        eprintln!("warning: tracing not initialized: {err}");
    }

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header);

    match run(&cli, &ctx) {
        Ok(()) => {}
        Err(err) => {
            tracing::debug!(code = err.code(), "command failed");
            let error_output = ErrorOutput::from_analysis_error(&err);
            write_error(&error_output, cli.output, cli.json);
            std::process::exit(err.exit_code());
        }
    }
}

fn run(cli: &Cli, ctx: &OutputCtx) -> Result<(), AnalysisError> {
    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::resolve(
        config,
        std::env::var_os("BROCCOLI_DIR"),
        cli.broccoli_dir.clone(),
    );
    tracing::debug!(?settings, "resolved settings");
    commands::dispatch(&cli.command, &settings, ctx)
}
