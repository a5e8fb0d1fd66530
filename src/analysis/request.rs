/// Analysis request types.
///
/// A request is a flat record of named inputs for one BROCCOLI interface.
/// It is built once, validated, turned into a command line and consumed.
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::errors::AnalysisError;

/// Default proportion of variance (percent) kept before ICA.
pub const DEFAULT_ICA_VARIANCE: f64 = 80.0;

/// The BROCCOLI interfaces this tool can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    /// Per-subject GLM with registration to MNI space.
    Firstlevel,
    /// Independent component analysis of a single fMRI run.
    Ica,
}

impl InterfaceKind {
    /// Name of the bash-wrapper binary.
    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Self::Firstlevel => "FirstLevelAnalysis",
            Self::Ica => "ICA",
        }
    }

    pub const ALL: [Self; 2] = [Self::Firstlevel, Self::Ica];
}

/// First-level (single subject) GLM analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirstLevelRequest {
    /// MNI template volume.
    pub mni_file: PathBuf,
    /// Filter definitions for parametric (linear) registration.
    pub filters_parametric: PathBuf,
    /// Filter definitions for non-parametric registration.
    pub filters_nonparametric: PathBuf,
    /// Anatomical (T1) volume.
    pub t1_file: PathBuf,
    /// Functional (BOLD) volume.
    pub fmri_file: PathBuf,
    /// Directory with the GLM onset / regressor files.
    pub glm_path: PathBuf,
    #[serde(default)]
    pub opencl_platform: u32,
    #[serde(default)]
    pub opencl_device: u32,
    /// Output base name. Defaults to the fMRI file stem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// Independent component analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IcaRequest {
    /// fMRI volume to decompose.
    pub input: PathBuf,
    #[serde(default)]
    pub opencl_platform: u32,
    #[serde(default)]
    pub opencl_device: u32,
    /// Smoothing before ICA, FWHM in mm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing: Option<f32>,
    #[serde(default)]
    pub motion_correction: bool,
    /// Percent of variance kept by the PCA step, in `(0, 100)`.
    #[serde(default = "default_variance")]
    pub variance: f64,
    /// Spatial mask. When absent the tool masks automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<PathBuf>,
    /// Z-score each time series before ICA.
    #[serde(default)]
    pub zscore: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub debug: bool,
}

fn default_variance() -> f64 {
    DEFAULT_ICA_VARIANCE
}

/// A request for any supported interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "interface", rename_all = "lowercase")]
pub enum AnalysisRequest {
    Firstlevel(FirstLevelRequest),
    Ica(IcaRequest),
}

impl AnalysisRequest {
    #[must_use]
    pub fn kind(&self) -> InterfaceKind {
        match self {
            Self::Firstlevel(_) => InterfaceKind::Firstlevel,
            Self::Ica(_) => InterfaceKind::Ica,
        }
    }

    /// Check that inputs exist and parameters are in range.
    ///
    /// # Errors
    ///
    /// - `AnalysisError::InputNotFound` for the first missing path
    /// - `AnalysisError::InvalidParameter` for an out-of-range value
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self {
            Self::Firstlevel(r) => r.validate(),
            Self::Ica(r) => r.validate(),
        }
    }
}

impl FirstLevelRequest {
    fn validate(&self) -> Result<(), AnalysisError> {
        require_file("mni_file", &self.mni_file)?;
        require_file("filters_parametric", &self.filters_parametric)?;
        require_file("filters_nonparametric", &self.filters_nonparametric)?;
        require_file("t1_file", &self.t1_file)?;
        require_file("fmri_file", &self.fmri_file)?;
        require_dir("glm_path", &self.glm_path)
    }
}

impl IcaRequest {
    fn validate(&self) -> Result<(), AnalysisError> {
        require_file("input", &self.input)?;
        if let Some(mask) = &self.mask {
            require_file("mask", mask)?;
        }
        if let Some(s) = self.smoothing {
            if !s.is_finite() || s <= 0.0 {
                return Err(AnalysisError::InvalidParameter {
                    field: "smoothing",
                    message: format!("must be > 0.0 mm, got {s}"),
                });
            }
        }
        if !(self.variance > 0.0 && self.variance < 100.0) {
            return Err(AnalysisError::InvalidParameter {
                field: "variance",
                message: format!("must be in (0, 100), got {}", self.variance),
            });
        }
        Ok(())
    }
}

fn require_file(field: &'static str, path: &Path) -> Result<(), AnalysisError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AnalysisError::InputNotFound {
            field,
            path: path.display().to_string(),
        })
    }
}

fn require_dir(field: &'static str, path: &Path) -> Result<(), AnalysisError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(AnalysisError::InputNotFound {
            field,
            path: path.display().to_string(),
        })
    }
}

#[cfg(test)]
pub mod fixtures {
    //! Request builders backed by real files in a temp dir.
    use std::fs;
    use std::path::Path;

    use super::{DEFAULT_ICA_VARIANCE, FirstLevelRequest, IcaRequest};

    /// Create a subject layout under `root` and a request pointing at it.
    pub fn first_level(root: &Path) -> FirstLevelRequest {
        let glm = root.join("model/onsets");
        fs::create_dir_all(&glm).unwrap();
        fs::create_dir_all(root.join("anatomy")).unwrap();
        fs::create_dir_all(root.join("BOLD")).unwrap();
        for f in [
            "MNI152_T1_2mm.nii",
            "filters_for_parametric_registration.mat",
            "filters_for_nonparametric_registration.mat",
            "anatomy/highres001_brain.nii.gz",
            "BOLD/bold.nii.gz",
        ] {
            fs::write(root.join(f), b"").unwrap();
        }
        FirstLevelRequest {
            mni_file: root.join("MNI152_T1_2mm.nii"),
            filters_parametric: root.join("filters_for_parametric_registration.mat"),
            filters_nonparametric: root.join("filters_for_nonparametric_registration.mat"),
            t1_file: root.join("anatomy/highres001_brain.nii.gz"),
            fmri_file: root.join("BOLD/bold.nii.gz"),
            glm_path: glm,
            opencl_platform: 0,
            opencl_device: 0,
            output: None,
            quiet: false,
            verbose: false,
        }
    }

    pub fn ica(root: &Path) -> IcaRequest {
        fs::write(root.join("rest.nii"), b"").unwrap();
        IcaRequest {
            input: root.join("rest.nii"),
            opencl_platform: 0,
            opencl_device: 0,
            smoothing: None,
            motion_correction: false,
            variance: DEFAULT_ICA_VARIANCE,
            mask: None,
            zscore: false,
            output: None,
            quiet: false,
            verbose: false,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_first_level() {
        let dir = tempfile::tempdir().unwrap();
        let req = AnalysisRequest::Firstlevel(fixtures::first_level(dir.path()));
        assert!(req.validate().is_ok());
        assert_eq!(req.kind().tool_name(), "FirstLevelAnalysis");
    }

    #[test]
    fn test_missing_t1_reported_by_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = fixtures::first_level(dir.path());
        req.t1_file = dir.path().join("anatomy/missing.nii.gz");
        match AnalysisRequest::Firstlevel(req).validate() {
            Err(AnalysisError::InputNotFound { field, .. }) => assert_eq!(field, "t1_file"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_fmri_reported_by_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = fixtures::first_level(dir.path());
        req.fmri_file = dir.path().join("BOLD/none.nii.gz");
        match AnalysisRequest::Firstlevel(req).validate() {
            Err(AnalysisError::InputNotFound { field, .. }) => assert_eq!(field, "fmri_file"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_glm_path_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = fixtures::first_level(dir.path());
        req.glm_path = req.mni_file.clone();
        assert!(matches!(
            AnalysisRequest::Firstlevel(req).validate(),
            Err(AnalysisError::InputNotFound {
                field: "glm_path",
                ..
            })
        ));
    }

    #[test]
    fn test_ica_parameter_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let base = fixtures::ica(dir.path());

        let mut r = base.clone();
        r.smoothing = Some(0.0);
        assert!(matches!(
            AnalysisRequest::Ica(r).validate(),
            Err(AnalysisError::InvalidParameter {
                field: "smoothing",
                ..
            })
        ));

        for v in [0.0, 100.0, -5.0, f64::NAN] {
            let mut r = base.clone();
            r.variance = v;
            assert!(
                AnalysisRequest::Ica(r).validate().is_err(),
                "variance {v} accepted"
            );
        }

        let mut r = base;
        r.smoothing = Some(6.0);
        r.variance = 99.5;
        assert!(AnalysisRequest::Ica(r).validate().is_ok());
    }

    #[test]
    fn test_ica_missing_mask() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = fixtures::ica(dir.path());
        r.mask = Some(dir.path().join("mask.nii"));
        assert!(matches!(
            AnalysisRequest::Ica(r).validate(),
            Err(AnalysisError::InputNotFound { field: "mask", .. })
        ));
    }
}
