/// Errors from the BROCCOLI tool layer (installation lookup and process spawning).
use thiserror::Error;

/// Typed errors from the tool layer.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No BROCCOLI installation directory was configured.
    #[error(
        "BROCCOLI_DIR is not set. Pass --broccoli-dir, export BROCCOLI_DIR, or set broccoli_dir in the config file"
    )]
    BroccoliDirUnset,

    /// The tool binary was not found in any search location.
    #[error("BROCCOLI tool '{tool}' not found (searched: {})", searched.join(", "))]
    NotFound {
        /// Binary name, e.g. `FirstLevelAnalysis`.
        tool: String,
        /// Human-readable list of the places that were searched.
        searched: Vec<String>,
    },

    /// The operating system refused to start the tool.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program path that was executed.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
