/// Expected output files of a finished run.
///
/// The tools name their outputs after the input volume (or `-output`) with
/// a per-output suffix, keeping the input's NIfTI extension.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::request::{AnalysisRequest, FirstLevelRequest, IcaRequest};

/// Suffix the ICA tool appends when no `-output` is given.
pub const ICA_SUFFIX: &str = "_ica";

/// Output suffixes written by first-level analysis, paired with their names.
pub const FIRST_LEVEL_OUTPUTS: [(&str, &str); 3] = [
    ("beta_volumes", "_beta"),
    ("contrast_volumes", "_cope"),
    ("statistical_maps", "_statmap"),
];

/// A named output and where the tool is expected to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedOutput {
    pub name: &'static str,
    pub path: PathBuf,
}

/// Split a NIfTI path into (path without extension, extension).
///
/// `.nii.gz` is treated as one extension. A path with neither `.nii` nor
/// `.nii.gz` is returned unchanged with a `.nii` extension.
#[must_use]
pub fn split_nifti(path: &Path) -> (PathBuf, &'static str) {
    let s = path.as_os_str().to_string_lossy();
    for ext in [".nii.gz", ".nii"] {
        if let Some(stem) = s.strip_suffix(ext) {
            return (PathBuf::from(stem), ext);
        }
    }
    (path.to_path_buf(), ".nii")
}

fn with_suffix(base: &Path, suffix: &str, ext: &str) -> PathBuf {
    let mut s: OsString = base.as_os_str().to_owned();
    s.push(suffix);
    s.push(ext);
    PathBuf::from(s)
}

/// Every output file `request` is expected to produce.
#[must_use]
pub fn expected_outputs(request: &AnalysisRequest) -> Vec<ExpectedOutput> {
    match request {
        AnalysisRequest::Firstlevel(r) => first_level_outputs(r),
        AnalysisRequest::Ica(r) => ica_outputs(r),
    }
}

fn first_level_outputs(r: &FirstLevelRequest) -> Vec<ExpectedOutput> {
    let (fmri_base, ext) = split_nifti(&r.fmri_file);
    let base = r
        .output
        .as_ref()
        .map_or(fmri_base, |o| split_nifti(o).0);
    FIRST_LEVEL_OUTPUTS
        .iter()
        .map(|&(name, suffix)| ExpectedOutput {
            name,
            path: with_suffix(&base, suffix, ext),
        })
        .collect()
}

fn ica_outputs(r: &IcaRequest) -> Vec<ExpectedOutput> {
    let path = match &r.output {
        Some(out) => out.clone(),
        None => {
            let (base, ext) = split_nifti(&r.input);
            with_suffix(&base, ICA_SUFFIX, ext)
        }
    };
    vec![ExpectedOutput {
        name: "components",
        path,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::request::fixtures;

    #[test]
    fn test_split_nifti() {
        assert_eq!(
            split_nifti(Path::new("/d/bold.nii.gz")),
            (PathBuf::from("/d/bold"), ".nii.gz")
        );
        assert_eq!(
            split_nifti(Path::new("rest.nii")),
            (PathBuf::from("rest"), ".nii")
        );
        assert_eq!(
            split_nifti(Path::new("/d/volume")),
            (PathBuf::from("/d/volume"), ".nii")
        );
    }

    #[test]
    fn test_ica_default_output_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = fixtures::ica(dir.path());
        r.input = dir.path().join("rest.nii.gz");
        let outs = expected_outputs(&AnalysisRequest::Ica(r));
        assert_eq!(outs.len(), 1);
        assert_eq!(outs[0].path, dir.path().join("rest_ica.nii.gz"));
    }

    #[test]
    fn test_ica_explicit_output_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = fixtures::ica(dir.path());
        r.output = Some(PathBuf::from("/out/components.nii"));
        let outs = expected_outputs(&AnalysisRequest::Ica(r));
        assert_eq!(outs[0].path, PathBuf::from("/out/components.nii"));
    }

    #[test]
    fn test_first_level_outputs_follow_fmri_name() {
        let dir = tempfile::tempdir().unwrap();
        let r = fixtures::first_level(dir.path());
        let outs = expected_outputs(&AnalysisRequest::Firstlevel(r));
        let names: Vec<_> = outs.iter().map(|o| o.name).collect();
        assert_eq!(
            names,
            ["beta_volumes", "contrast_volumes", "statistical_maps"]
        );
        assert_eq!(outs[0].path, dir.path().join("BOLD/bold_beta.nii.gz"));
        assert_eq!(outs[2].path, dir.path().join("BOLD/bold_statmap.nii.gz"));
    }

    #[test]
    fn test_first_level_output_base_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = fixtures::first_level(dir.path());
        r.output = Some(PathBuf::from("/results/sub001"));
        let outs = expected_outputs(&AnalysisRequest::Firstlevel(r));
        assert_eq!(outs[1].path, PathBuf::from("/results/sub001_cope.nii.gz"));
    }
}
