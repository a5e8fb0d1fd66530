/// Errors from the analysis domain layer.
use thiserror::Error;

use crate::broccoli::ToolError;

/// Errors that can occur while preparing or running an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required input file or directory is missing.
    #[error("{field}: '{path}' does not exist")]
    InputNotFound {
        /// Request field name, e.g. `t1_file`.
        field: &'static str,
        path: String,
    },

    /// A numeric or enumerated parameter is out of range.
    #[error("{field}: {message}")]
    InvalidParameter {
        field: &'static str,
        message: String,
    },

    /// A request file could not be read or decoded.
    #[error("Request file '{path}': {message}")]
    RequestFile { path: String, message: String },

    /// The config file could not be read or decoded.
    #[error("Config file '{path}': {message}")]
    Config { path: String, message: String },

    /// The tool ran and exited unsuccessfully.
    #[error("{tool} failed ({}){}", status_text(*status), tail_text(tail))]
    ToolFailed {
        tool: &'static str,
        /// Exit code, `None` when killed by a signal.
        status: Option<i32>,
        /// Last lines of the tool's diagnostic output.
        tail: String,
    },

    /// Tool discovery or spawn failure.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

fn status_text(status: Option<i32>) -> String {
    status.map_or_else(|| "killed by signal".to_owned(), |c| format!("exit code {c}"))
}

fn tail_text(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!(":\n{tail}")
    }
}

impl AnalysisError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { .. } | Self::Tool(ToolError::Spawn { .. }) => 1,
            Self::InvalidParameter { .. } | Self::RequestFile { .. } | Self::Config { .. } => 2,
            Self::Tool(ToolError::BroccoliDirUnset | ToolError::NotFound { .. }) => 3,
            Self::InputNotFound { .. } => 4,
        }
    }

    /// Machine-readable error code (snake_case).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "input_not_found",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::RequestFile { .. } => "request_file",
            Self::Config { .. } => "config",
            Self::ToolFailed { .. } => "tool_failed",
            Self::Tool(ToolError::BroccoliDirUnset) => "broccoli_dir_unset",
            Self::Tool(ToolError::NotFound { .. }) => "tool_not_found",
            Self::Tool(ToolError::Spawn { .. }) => "spawn_failed",
        }
    }
}
