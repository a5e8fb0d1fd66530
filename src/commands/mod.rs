/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod check;
pub mod describe;
pub mod firstlevel;
pub mod ica;
pub mod pipeline;
pub mod run;

use crate::analysis::AnalysisError;
use crate::cli::OutputCtx;
use crate::cli::args::Command;
use crate::config::Settings;

/// Dispatch a parsed `Command` to its handler.
///
/// # Errors
///
/// Returns `AnalysisError` on any command failure.
pub fn dispatch(command: &Command, settings: &Settings, ctx: &OutputCtx) -> Result<(), AnalysisError> {
    match command {
        Command::Firstlevel(args) => firstlevel::run(args, settings, ctx),
        Command::Ica(args) => ica::run(args, settings, ctx),
        Command::Run(args) => run::run(args, settings, ctx),
        Command::Describe(args) => describe::run(args, ctx),
        Command::Check => check::run(settings, ctx),
    }
}
