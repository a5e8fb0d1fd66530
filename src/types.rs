/// Shared serializable output types for all commands.
///
/// These types are what gets written to stdout — either as JSON or rendered
/// as a table. They are decoupled from the internal request / invocation types.
use serde::Serialize;

use crate::analysis::{AnalysisError, AnalysisRequest};
use crate::broccoli::LocationSource;

/// Result of a completed tool run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResultOutput {
    /// Tool binary name, e.g. `FirstLevelAnalysis`.
    pub tool: String,
    /// Full shell-quoted command line that was executed.
    pub cmdline: String,
    /// Exit code, null when killed by a signal.
    pub return_code: Option<i32>,
    /// Wall-clock runtime in seconds.
    pub duration_secs: f64,
    /// Captured standard output (empty when streamed).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    /// Captured standard error (empty when streamed).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    /// The request as executed.
    pub inputs: AnalysisRequest,
    /// Expected output files and whether the tool produced them.
    pub outputs: Vec<OutputFileOutput>,
}

/// One expected output file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputFileOutput {
    pub name: String,
    pub path: String,
    pub exists: bool,
}

/// What would be executed, for `--dry-run`.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunOutput {
    pub tool: String,
    pub cmdline: String,
    pub inputs: AnalysisRequest,
}

/// Installation check report.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    /// True when every tool resolved.
    pub ok: bool,
    /// Resolved BROCCOLI directory, or null if none is configured.
    pub broccoli_dir: Option<String>,
    /// Whether `<broccoli_dir>/filters` exists.
    pub filters_dir: bool,
    /// Whether `<broccoli_dir>/brain_templates` exists.
    pub templates_dir: bool,
    pub tools: Vec<ToolStatusOutput>,
}

/// Lookup result for one tool binary.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStatusOutput {
    pub tool: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LocationSource>,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Request field the error refers to, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorOutput {
    /// Construct from an `AnalysisError`.
    #[must_use]
    pub fn from_analysis_error(err: &AnalysisError) -> Self {
        let field = match err {
            AnalysisError::InputNotFound { field, .. }
            | AnalysisError::InvalidParameter { field, .. } => Some((*field).to_owned()),
            _ => None,
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: err.code().to_owned(),
                message: err.to_string(),
                field,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_json() {
        let err = AnalysisError::InputNotFound {
            field: "fmri_file",
            path: "/data/bold.nii.gz".to_owned(),
        };
        let json = serde_json::to_value(ErrorOutput::from_analysis_error(&err)).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "input_not_found");
        assert_eq!(json["error"]["field"], "fmri_file");
        assert_eq!(
            json["error"]["message"],
            "fmri_file: '/data/bold.nii.gz' does not exist"
        );
    }
}
