/// Command-line assembly for the BROCCOLI bash wrappers.
///
/// The wrappers take their input volumes as leading positional arguments
/// followed by single-dash `-option [value]` pairs.
use std::ffi::OsString;
use std::path::Path;

use super::request::{AnalysisRequest, FirstLevelRequest, IcaRequest};

/// Build the argument vector (without the program name) for `request`.
#[must_use]
pub fn build_args(request: &AnalysisRequest) -> Vec<OsString> {
    match request {
        AnalysisRequest::Firstlevel(r) => first_level_args(r),
        AnalysisRequest::Ica(r) => ica_args(r),
    }
}

fn first_level_args(r: &FirstLevelRequest) -> Vec<OsString> {
    let mut args = ArgList::default();
    args.path(&r.fmri_file);
    args.path(&r.t1_file);
    args.path(&r.mni_file);
    args.opt_path("-glmpath", &r.glm_path);
    args.opt_path("-filtersparametric", &r.filters_parametric);
    args.opt_path("-filtersnonparametric", &r.filters_nonparametric);
    args.opt("-platform", r.opencl_platform);
    args.opt("-device", r.opencl_device);
    if let Some(out) = &r.output {
        args.opt_path("-output", out);
    }
    args.flag("-quiet", r.quiet);
    args.flag("-verbose", r.verbose);
    args.0
}

fn ica_args(r: &IcaRequest) -> Vec<OsString> {
    let mut args = ArgList::default();
    args.path(&r.input);
    args.opt("-platform", r.opencl_platform);
    args.opt("-device", r.opencl_device);
    if let Some(s) = r.smoothing {
        args.opt("-smoothing", s);
    }
    args.flag("-motioncorrection", r.motion_correction);
    args.opt("-var", r.variance);
    if let Some(mask) = &r.mask {
        args.opt_path("-mask", mask);
    }
    args.flag("-zscore", r.zscore);
    if let Some(out) = &r.output {
        args.opt_path("-output", out);
    }
    args.flag("-quiet", r.quiet);
    args.flag("-verbose", r.verbose);
    args.flag("-debug", r.debug);
    args.0
}

#[derive(Default)]
struct ArgList(Vec<OsString>);

impl ArgList {
    fn path(&mut self, p: &Path) {
        self.0.push(p.as_os_str().to_owned());
    }

    fn opt(&mut self, name: &str, value: impl ToString) {
        self.0.push(name.into());
        self.0.push(value.to_string().into());
    }

    fn opt_path(&mut self, name: &str, p: &Path) {
        self.0.push(name.into());
        self.path(p);
    }

    fn flag(&mut self, name: &str, on: bool) {
        if on {
            self.0.push(name.into());
        }
    }
}
