/// The invocation pipeline shared by every command that runs a tool:
/// validate, locate, execute, report.
use std::path::PathBuf;

use crate::analysis::{AnalysisError, AnalysisRequest, build_args, expected_outputs, interface_doc, render_help};
use crate::broccoli::{Capture, Invocation, ProcessRunner, RawOutput, Runner, locate_tool};
use crate::cli::{ExecFlags, OutputCtx};
use crate::cli::output::{tail, write_dry_run, write_run_result};
use crate::config::Settings;
use crate::types::{DryRunOutput, OutputFileOutput, RunResultOutput};

/// Lines of tool output carried in a `ToolFailed` error.
const FAILURE_TAIL_LINES: usize = 20;

/// What the pipeline produced.
#[derive(Debug)]
pub enum Outcome {
    /// `--dry-run`: the command that would have been executed.
    Planned(DryRunOutput),
    /// The tool ran and exited successfully.
    Completed(RunResultOutput),
}

/// Run `request` with the real process runner and print the outcome.
///
/// With `--show-help` the interface help is printed first: on stdout in
/// table mode, on stderr in JSON modes so stdout stays a single document.
///
/// # Errors
///
/// Returns `AnalysisError` from validation, tool discovery or execution.
pub fn run(
    request: &AnalysisRequest,
    flags: &ExecFlags,
    settings: &Settings,
    ctx: &OutputCtx,
) -> Result<(), AnalysisError> {
    if flags.show_help {
        let text = render_help(&interface_doc(request.kind()));
        if matches!(
            ctx.format,
            crate::cli::OutputFormat::Json | crate::cli::OutputFormat::Compact
        ) {
            eprint!("{text}");
        } else {
            println!("{text}");
        }
    }

    match execute(request, flags, settings, &ProcessRunner, ctx)? {
        Outcome::Planned(plan) => write_dry_run(&plan, ctx),
        Outcome::Completed(result) => write_run_result(&result, ctx),
    }
    Ok(())
}

/// Validate, resolve and (unless `--dry-run`) execute `request` on `runner`.
///
/// A dry run tolerates a missing BROCCOLI directory or tool binary and
/// falls back to the bare tool name.
///
/// # Errors
///
/// - `AnalysisError::InputNotFound` / `InvalidParameter` from validation
/// - `AnalysisError::Tool` when BROCCOLI or the binary cannot be found or started
/// - `AnalysisError::ToolFailed` when the tool exits unsuccessfully
pub fn execute(
    request: &AnalysisRequest,
    flags: &ExecFlags,
    settings: &Settings,
    runner: &dyn Runner,
    ctx: &OutputCtx,
) -> Result<Outcome, AnalysisError> {
    let tool = request.kind().tool_name();

    if flags.no_validate {
        tracing::info!(tool, "skipping local input validation");
    } else {
        let _t_validate = ctx.timer("validate");
        request.validate()?;
    }

    let broccoli_dir = match settings.require_broccoli_dir() {
        Ok(dir) => dir.to_path_buf(),
        Err(err) if flags.dry_run => {
            tracing::warn!("{err}");
            PathBuf::new()
        }
        Err(err) => return Err(err.into()),
    };

    let _t_locate = ctx.timer("locate_tool");
    let program = match locate_tool(tool, settings) {
        Ok(location) => {
            tracing::debug!(path = %location.path.display(), source = ?location.source, "found {tool}");
            location.path
        }
        Err(err) if flags.dry_run => {
            tracing::warn!("{err}");
            PathBuf::from(tool)
        }
        Err(err) => return Err(err.into()),
    };
    drop(_t_locate);

    let invocation = Invocation {
        program,
        args: build_args(request),
        broccoli_dir,
        capture: if flags.stream {
            Capture::Inherit
        } else {
            Capture::Piped
        },
    };
    let cmdline = invocation.command_line();

    if flags.dry_run {
        return Ok(Outcome::Planned(DryRunOutput {
            tool: tool.to_owned(),
            cmdline,
            inputs: request.clone(),
        }));
    }

    tracing::info!(tool, %cmdline, "running");
    let _t_run = ctx.timer("run_tool");
    let raw = runner.run(&invocation)?;
    drop(_t_run);

    if !raw.success() {
        return Err(AnalysisError::ToolFailed {
            tool,
            status: raw.status,
            tail: failure_tail(&raw),
        });
    }

    let outputs = expected_outputs(request)
        .into_iter()
        .map(|o| OutputFileOutput {
            name: o.name.to_owned(),
            exists: o.path.exists(),
            path: o.path.display().to_string(),
        })
        .collect::<Vec<_>>();
    for missing in outputs.iter().filter(|o| !o.exists) {
        tracing::warn!(output = %missing.name, path = %missing.path, "expected output not found");
    }

    Ok(Outcome::Completed(RunResultOutput {
        tool: tool.to_owned(),
        cmdline,
        return_code: raw.status,
        duration_secs: raw.duration.as_secs_f64(),
        stdout: raw.stdout,
        stderr: raw.stderr,
        inputs: request.clone(),
        outputs,
    }))
}

/// The tools print most diagnostics on stdout, so fall back to it when
/// stderr is empty.
fn failure_tail(raw: &RawOutput) -> String {
    let source = if raw.stderr.trim().is_empty() {
        &raw.stdout
    } else {
        &raw.stderr
    };
    tail(source, FAILURE_TAIL_LINES)
}
