/// `check` command: verify the BROCCOLI installation and tool binaries.
use crate::analysis::{AnalysisError, InterfaceKind};
use crate::broccoli::{ToolError, has_subdir, locate_tool};
use crate::cli::OutputCtx;
use crate::cli::output::write_check;
use crate::config::Settings;
use crate::types::{CheckOutput, ToolStatusOutput};

/// Inspect the installation described by `settings`.
#[must_use]
pub fn inspect(settings: &Settings) -> (CheckOutput, Option<ToolError>) {
    let mut first_error = None;
    let mut tools = Vec::new();

    for kind in InterfaceKind::ALL {
        let tool = kind.tool_name();
        match locate_tool(tool, settings) {
            Ok(location) => tools.push(ToolStatusOutput {
                tool: tool.to_owned(),
                found: true,
                path: Some(location.path.display().to_string()),
                source: Some(location.source),
            }),
            Err(err) => {
                tools.push(ToolStatusOutput {
                    tool: tool.to_owned(),
                    found: false,
                    path: None,
                    source: None,
                });
                first_error.get_or_insert(err);
            }
        }
    }

    let dir = settings.broccoli_dir.as_deref();
    if dir.is_none() {
        first_error = Some(ToolError::BroccoliDirUnset);
    }

    let report = CheckOutput {
        ok: first_error.is_none(),
        broccoli_dir: dir.map(|d| d.display().to_string()),
        filters_dir: dir.is_some_and(|d| has_subdir(d, "filters")),
        templates_dir: dir.is_some_and(|d| has_subdir(d, "brain_templates")),
        tools,
    };
    (report, first_error)
}

/// Run `broccoli-run check`.
///
/// Prints the report, then exits 0 if every tool resolved, 3 otherwise.
///
/// # Errors
///
/// Returns `ToolError::BroccoliDirUnset` or the first `ToolError::NotFound`.
pub fn run(settings: &Settings, ctx: &OutputCtx) -> Result<(), AnalysisError> {
    let (report, error) = inspect(settings);
    write_check(&report, ctx);
    match error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
