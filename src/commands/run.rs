/// `run` command: execute the analysis described by a TOML request file.
use crate::analysis::{AnalysisError, load_request};
use crate::cli::OutputCtx;
use crate::cli::args::RunArgs;
use crate::config::Settings;

use super::pipeline;

/// Run `broccoli-run run`.
///
/// # Errors
///
/// Returns `AnalysisError::RequestFile` if the file cannot be decoded, or any
/// error from the invocation pipeline.
pub fn run(args: &RunArgs, settings: &Settings, ctx: &OutputCtx) -> Result<(), AnalysisError> {
    let _t_load = ctx.timer("load_request");
    let request = load_request(&args.request, settings)?;
    drop(_t_load);

    tracing::debug!(interface = ?request.kind(), file = %args.request.display(), "loaded request");
    pipeline::run(&request, &args.exec, settings, ctx)
}
