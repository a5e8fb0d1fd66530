/// Tool discovery: map a BROCCOLI binary name to an executable path.
///
/// Search order:
///
/// 1. `<broccoli_dir>/compiled/Bash/Linux/Release/<tool>` (the layout of a
///    BROCCOLI source checkout after building the bash wrappers).
/// 2. `<bin_dir>/<tool>` when a `bin_dir` is configured.
/// 3. `PATH`.
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::errors::ToolError;
use crate::config::Settings;

/// Where compiled bash-wrapper binaries live inside a BROCCOLI checkout.
pub const RELEASE_SUBDIR: &str = "compiled/Bash/Linux/Release";

/// Which search location produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    BroccoliDir,
    BinDir,
    Path,
}

/// A resolved tool binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocation {
    pub path: PathBuf,
    pub source: LocationSource,
}

/// Resolve `tool` to an executable path.
///
/// # Errors
///
/// Returns `ToolError::NotFound` when no search location has the binary.
pub fn locate_tool(tool: &str, settings: &Settings) -> Result<ToolLocation, ToolError> {
    let mut searched = Vec::new();

    if let Some(dir) = &settings.broccoli_dir {
        let candidate = dir.join(RELEASE_SUBDIR).join(tool);
        if candidate.is_file() {
            return Ok(ToolLocation {
                path: candidate,
                source: LocationSource::BroccoliDir,
            });
        }
        searched.push(candidate.display().to_string());
    }

    if let Some(dir) = &settings.bin_dir {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return Ok(ToolLocation {
                path: candidate,
                source: LocationSource::BinDir,
            });
        }
        searched.push(candidate.display().to_string());
    }

    match which::which(tool) {
        Ok(path) => Ok(ToolLocation {
            path,
            source: LocationSource::Path,
        }),
        Err(_) => {
            searched.push("PATH".to_owned());
            Err(ToolError::NotFound {
                tool: tool.to_owned(),
                searched,
            })
        }
    }
}

/// Whether a directory inside the BROCCOLI checkout exists.
#[must_use]
pub fn has_subdir(broccoli_dir: &Path, name: &str) -> bool {
    broccoli_dir.join(name).is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(broccoli_dir: Option<&Path>, bin_dir: Option<&Path>) -> Settings {
        Settings {
            broccoli_dir: broccoli_dir.map(Path::to_path_buf),
            bin_dir: bin_dir.map(Path::to_path_buf),
            opencl_platform: 0,
            opencl_device: 0,
        }
    }

    #[test]
    fn test_finds_release_binary() {
        let root = tempfile::tempdir().unwrap();
        let release = root.path().join(RELEASE_SUBDIR);
        std::fs::create_dir_all(&release).unwrap();
        std::fs::write(release.join("BroccoliTestTool"), b"").unwrap();

        let loc = locate_tool("BroccoliTestTool", &settings(Some(root.path()), None)).unwrap();
        assert_eq!(loc.source, LocationSource::BroccoliDir);
        assert_eq!(loc.path, release.join("BroccoliTestTool"));
    }

    #[test]
    fn test_falls_back_to_bin_dir() {
        let root = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        std::fs::write(bin.path().join("BroccoliTestTool"), b"").unwrap();

        let loc = locate_tool(
            "BroccoliTestTool",
            &settings(Some(root.path()), Some(bin.path())),
        )
        .unwrap();
        assert_eq!(loc.source, LocationSource::BinDir);
    }

    #[test]
    fn test_not_found_lists_searched_locations() {
        let root = tempfile::tempdir().unwrap();
        let err = locate_tool(
            "BroccoliToolThatDoesNotExist",
            &settings(Some(root.path()), None),
        )
        .unwrap_err();
        match err {
            ToolError::NotFound { tool, searched } => {
                assert_eq!(tool, "BroccoliToolThatDoesNotExist");
                assert_eq!(searched.len(), 2);
                assert_eq!(searched[1], "PATH");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_has_subdir() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("filters")).unwrap();
        assert!(has_subdir(root.path(), "filters"));
        assert!(!has_subdir(root.path(), "brain_templates"));
    }
}
