/// Request files: a TOML document describing one analysis.
///
/// ```toml
/// interface = "firstlevel"
/// mni_file = "${BROCCOLI_DIR}/brain_templates/MNI152_T1_2mm.nii"
/// t1_file = "${subject_dir}/anatomy/highres001_brain.nii.gz"
///
/// [vars]
/// subject_dir = "/data/ds003/sub001"
/// ```
///
/// `${name}` references in string values are expanded from `[vars]` and the
/// built-in variables (`BROCCOLI_DIR`, `HOME`); a `[vars]` entry shadows a
/// built-in of the same name. Unknown references are left untouched.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use toml::{Table, Value};

use super::errors::AnalysisError;
use super::request::AnalysisRequest;
use crate::config::Settings;

const VARS_KEY: &str = "vars";

/// Nesting limit for variables defined in terms of other variables.
const MAX_VAR_DEPTH: usize = 8;

/// Variables available to every request file.
#[must_use]
pub fn builtin_vars(settings: &Settings) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    if let Some(dir) = &settings.broccoli_dir {
        let s = dir.display().to_string();
        vars.insert("BROCCOLI_DIR".to_owned(), s.trim_end_matches('/').to_owned());
    }
    if let Some(home) = dirs::home_dir() {
        vars.insert("HOME".to_owned(), home.display().to_string());
    }
    vars
}

/// Read and decode a request file.
///
/// # Errors
///
/// Returns `AnalysisError::RequestFile` if the file is unreadable, is not
/// valid TOML, or does not describe a known interface.
pub fn load_request(path: &Path, settings: &Settings) -> Result<AnalysisRequest, AnalysisError> {
    let text = fs::read_to_string(path).map_err(|e| AnalysisError::RequestFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_request(&text, settings).map_err(|message| AnalysisError::RequestFile {
        path: path.display().to_string(),
        message,
    })
}

/// Decode request TOML. Errors are returned as parser messages.
///
/// # Errors
///
/// Returns a message on invalid TOML, a non-string `[vars]` entry, or a
/// document that does not match any interface.
pub fn parse_request(text: &str, settings: &Settings) -> Result<AnalysisRequest, String> {
    let mut table: Table = toml::from_str(text).map_err(|e| e.to_string())?;

    let mut vars = builtin_vars(settings);
    if let Some(user) = table.remove(VARS_KEY) {
        let Value::Table(user) = user else {
            return Err("[vars] must be a table".to_owned());
        };
        for (key, value) in user {
            let Value::String(s) = value else {
                return Err(format!("vars.{key} must be a string"));
            };
            vars.insert(key, s);
        }
        resolve_vars(&mut vars);
    }

    for (_, value) in table.iter_mut() {
        expand_value(value, &vars);
    }

    table
        .entry("opencl_platform")
        .or_insert(Value::Integer(i64::from(settings.opencl_platform)));
    table
        .entry("opencl_device")
        .or_insert(Value::Integer(i64::from(settings.opencl_device)));

    let request: AnalysisRequest = Value::Table(table).try_into().map_err(|e| e.to_string())?;
    Ok(request)
}

/// Expand variables that reference other variables, until nothing changes.
fn resolve_vars(vars: &mut HashMap<String, String>) {
    for _ in 0..MAX_VAR_DEPTH {
        let snapshot = vars.clone();
        let mut changed = false;
        for value in vars.values_mut() {
            let expanded = expand_string(value, &snapshot);
            if expanded != *value {
                *value = expanded;
                changed = true;
            }
        }
        if !changed {
            return;
        }
    }
    tracing::warn!("request file variables still unresolved after {MAX_VAR_DEPTH} passes");
}

fn expand_value(value: &mut Value, vars: &HashMap<String, String>) {
    match value {
        Value::String(s) => *s = expand_string(s, vars),
        Value::Array(items) => items.iter_mut().for_each(|v| expand_value(v, vars)),
        Value::Table(t) => t.iter_mut().for_each(|(_, v)| expand_value(v, vars)),
        _ => {}
    }
}

/// Replace every `${key}` in `s` with its value.
fn expand_string(s: &str, vars: &HashMap<String, String>) -> String {
    let mut result = s.to_owned();
    for (key, value) in vars {
        let pattern = format!("${{{key}}}");
        result = result.replace(&pattern, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn settings() -> Settings {
        Settings {
            broccoli_dir: Some(PathBuf::from("/opt/BROCCOLI/")),
            bin_dir: None,
            opencl_platform: 0,
            opencl_device: 1,
        }
    }

    const FIRST_LEVEL: &str = r#"
interface = "firstlevel"

mni_file = "${BROCCOLI_DIR}/brain_templates/MNI152_T1_2mm.nii"
filters_parametric = "${BROCCOLI_DIR}/code/Matlab_Wrapper/filters_for_parametric_registration.mat"
filters_nonparametric = "${BROCCOLI_DIR}/code/Matlab_Wrapper/filters_for_nonparametric_registration.mat"
t1_file = "${subject_dir}/anatomy/highres001_brain.nii.gz"
fmri_file = "${subject_dir}/BOLD/task001_run001/bold.nii.gz"
glm_path = "${subject_dir}/model/model001/onsets/task001_run001"

[vars]
dataset = "/data/OpenfMRI/ds003"
subject_dir = "${dataset}/sub001"
"#;

    #[test]
    fn test_first_level_with_vars() {
        let req = parse_request(FIRST_LEVEL, &settings()).unwrap();
        let AnalysisRequest::Firstlevel(r) = req else {
            panic!("wrong interface");
        };
        assert_eq!(
            r.mni_file,
            PathBuf::from("/opt/BROCCOLI/brain_templates/MNI152_T1_2mm.nii")
        );
        assert_eq!(
            r.fmri_file,
            PathBuf::from("/data/OpenfMRI/ds003/sub001/BOLD/task001_run001/bold.nii.gz")
        );
        // Device falls back to the configured default.
        assert_eq!(r.opencl_device, 1);
    }

    #[test]
    fn test_demo_request_parses() {
        let text = include_str!("../../demos/ds003_sub001.toml");
        let AnalysisRequest::Firstlevel(r) = parse_request(text, &settings()).unwrap() else {
            panic!("wrong interface");
        };
        assert_eq!(
            r.t1_file,
            PathBuf::from("/data/OpenfMRI/RhymeJudgment/ds003/sub001/anatomy/highres001_brain.nii.gz")
        );
        assert_eq!(r.opencl_device, 0);
    }

    #[test]
    fn test_explicit_device_wins_over_settings() {
        let text = r#"
interface = "ica"
input = "/d/rest.nii"
opencl_device = 0
smoothing = 6.0
"#;
        let AnalysisRequest::Ica(r) = parse_request(text, &settings()).unwrap() else {
            panic!("wrong interface");
        };
        assert_eq!(r.opencl_device, 0);
        assert_eq!(r.smoothing, Some(6.0));
        assert!((r.variance - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_interface_rejected() {
        let err = parse_request("interface = \"secondlevel\"\n", &settings()).unwrap_err();
        assert!(err.contains("secondlevel"), "{err}");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = "interface = \"ica\"\ninput = \"a.nii\"\nsmooth = 4.0\n";
        assert!(parse_request(text, &settings()).is_err());
    }

    #[test]
    fn test_negative_device_rejected() {
        let text = "interface = \"ica\"\ninput = \"a.nii\"\nopencl_device = -1\n";
        assert!(parse_request(text, &settings()).is_err());
    }

    #[test]
    fn test_non_string_var_rejected() {
        let text = "interface = \"ica\"\ninput = \"a.nii\"\n[vars]\nn = 3\n";
        assert_eq!(
            parse_request(text, &settings()).unwrap_err(),
            "vars.n must be a string"
        );
    }

    #[test]
    fn test_vars_resolve_regardless_of_order() {
        let text = r#"
interface = "ica"
input = "${a_run}/bold.nii"

[vars]
a_run = "${m_subject}/run1"
m_subject = "${z_root}/sub001"
z_root = "/data"
"#;
        let AnalysisRequest::Ica(r) = parse_request(text, &settings()).unwrap() else {
            panic!("wrong interface");
        };
        assert_eq!(r.input, PathBuf::from("/data/sub001/run1/bold.nii"));
    }

    #[test]
    fn test_unknown_reference_left_untouched() {
        let text = "interface = \"ica\"\ninput = \"${nope}/a.nii\"\n";
        let AnalysisRequest::Ica(r) = parse_request(text, &settings()).unwrap() else {
            panic!("wrong interface");
        };
        assert_eq!(r.input, PathBuf::from("${nope}/a.nii"));
    }

    #[test]
    fn test_load_request_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_request(&dir.path().join("req.toml"), &settings()).unwrap_err();
        assert!(matches!(err, AnalysisError::RequestFile { .. }));
    }
}
