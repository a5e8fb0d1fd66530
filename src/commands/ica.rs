/// `ica` command: run an independent component analysis from CLI flags.
use crate::analysis::{AnalysisError, AnalysisRequest, IcaRequest};
use crate::cli::OutputCtx;
use crate::cli::args::IcaArgs;
use crate::config::Settings;

use super::pipeline;

/// Build the request, filling the OpenCL selection from settings when not given.
#[must_use]
pub fn build_request(args: &IcaArgs, settings: &Settings) -> IcaRequest {
    IcaRequest {
        input: args.input.clone(),
        opencl_platform: args.opencl_platform.unwrap_or(settings.opencl_platform),
        opencl_device: args.opencl_device.unwrap_or(settings.opencl_device),
        smoothing: args.smoothing,
        motion_correction: args.motion_correction,
        variance: args.variance,
        mask: args.mask.clone(),
        zscore: args.zscore,
        output: args.out.clone(),
        quiet: args.quiet,
        verbose: args.verbose,
        debug: args.tool_debug,
    }
}

/// Run `broccoli-run ica`.
///
/// # Errors
///
/// Returns `AnalysisError` on invalid parameters, missing inputs, a missing
/// BROCCOLI installation, or a failed tool run.
pub fn run(args: &IcaArgs, settings: &Settings, ctx: &OutputCtx) -> Result<(), AnalysisError> {
    let request = AnalysisRequest::Ica(build_request(args, settings));
    pipeline::run(&request, &args.exec, settings, ctx)
}
