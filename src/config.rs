/// Configuration: `config.toml`, the `BROCCOLI_DIR` environment variable and CLI flags.
///
/// Precedence, highest first: CLI flag, `BROCCOLI_DIR`, config file, defaults.
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;

/// On-disk configuration. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of a BROCCOLI checkout.
    pub broccoli_dir: Option<PathBuf>,
    /// Extra directory holding tool binaries.
    pub bin_dir: Option<PathBuf>,
    pub opencl_platform: Option<u32>,
    pub opencl_device: Option<u32>,
}

impl Config {
    /// Default location: `<config_dir>/broccoli-run/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("broccoli-run").join("config.toml"))
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. The default path is optional: when it is
    /// missing, an empty config is returned.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Config` if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AnalysisError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path).map_err(|e| AnalysisError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&content).map_err(|message| AnalysisError::Config {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse config TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML parser message on invalid input.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// Effective settings after merging every source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub broccoli_dir: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    pub opencl_platform: u32,
    pub opencl_device: u32,
}

impl Settings {
    /// Merge the config file with the environment and CLI overrides.
    #[must_use]
    pub fn resolve(config: Config, env_dir: Option<OsString>, cli_dir: Option<PathBuf>) -> Self {
        let env_dir = env_dir.filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            broccoli_dir: cli_dir.or(env_dir).or(config.broccoli_dir),
            bin_dir: config.bin_dir,
            opencl_platform: config.opencl_platform.unwrap_or(0),
            opencl_device: config.opencl_device.unwrap_or(0),
        }
    }

    /// The BROCCOLI directory, which every tool run requires.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::BroccoliDirUnset` when no source provided one.
    pub fn require_broccoli_dir(&self) -> Result<&Path, crate::broccoli::ToolError> {
        self.broccoli_dir
            .as_deref()
            .ok_or(crate::broccoli::ToolError::BroccoliDirUnset)
    }
}
