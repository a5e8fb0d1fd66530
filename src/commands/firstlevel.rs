/// `firstlevel` command: run a first-level GLM analysis from CLI flags.
use crate::analysis::{AnalysisError, AnalysisRequest, FirstLevelRequest};
use crate::cli::OutputCtx;
use crate::cli::args::FirstLevelArgs;
use crate::config::Settings;

use super::pipeline;

/// Build the request, filling the OpenCL selection from settings when not given.
#[must_use]
pub fn build_request(args: &FirstLevelArgs, settings: &Settings) -> FirstLevelRequest {
    FirstLevelRequest {
        mni_file: args.mni_file.clone(),
        filters_parametric: args.filters_parametric.clone(),
        filters_nonparametric: args.filters_nonparametric.clone(),
        t1_file: args.t1_file.clone(),
        fmri_file: args.fmri_file.clone(),
        glm_path: args.glm_path.clone(),
        opencl_platform: args.opencl_platform.unwrap_or(settings.opencl_platform),
        opencl_device: args.opencl_device.unwrap_or(settings.opencl_device),
        output: args.out.clone(),
        quiet: args.quiet,
        verbose: args.verbose,
    }
}

/// Run `broccoli-run firstlevel`.
///
/// # Errors
///
/// Returns `AnalysisError` on missing inputs, a missing BROCCOLI installation,
/// or a failed tool run.
pub fn run(args: &FirstLevelArgs, settings: &Settings, ctx: &OutputCtx) -> Result<(), AnalysisError> {
    let request = AnalysisRequest::Firstlevel(build_request(args, settings));
    pipeline::run(&request, &args.exec, settings, ctx)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;
    use crate::cli::args::Command;

    fn parse(extra: &[&str]) -> FirstLevelArgs {
        let mut argv = vec![
            "broccoli-run",
            "firstlevel",
            "--mni-file",
            "mni.nii",
            "--filters-parametric",
            "p.mat",
            "--filters-nonparametric",
            "np.mat",
            "--t1-file",
            "t1.nii.gz",
            "--fmri-file",
            "bold.nii.gz",
            "--glm-path",
            "onsets",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Firstlevel(args) => args,
            other => panic!("wrong command: {other:?}"),
        }
    }

    #[test]
    fn test_device_defaults_from_settings() {
        let settings = Settings {
            opencl_device: 2,
            ..Settings::default()
        };
        let req = build_request(&parse(&[]), &settings);
        assert_eq!(req.opencl_device, 2);
        assert_eq!(req.opencl_platform, 0);
    }

    #[test]
    fn test_explicit_device_overrides_settings() {
        let settings = Settings {
            opencl_device: 2,
            ..Settings::default()
        };
        let req = build_request(&parse(&["--opencl-device", "0", "--out", "sub001"]), &settings);
        assert_eq!(req.opencl_device, 0);
        assert_eq!(req.output.as_deref(), Some(std::path::Path::new("sub001")));
        assert_eq!(req.t1_file, std::path::PathBuf::from("t1.nii.gz"));
    }
}
