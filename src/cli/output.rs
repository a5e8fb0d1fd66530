/// Output formatting: JSON and table modes. TTY detection.
use std::io::{IsTerminal, Write};

use comfy_table::{Cell, Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::analysis::help::{InterfaceDoc, render_help};
use crate::types::{CheckOutput, DryRunOutput, ErrorOutput, RunResultOutput};

/// Lines of captured tool output shown in table mode.
const TABLE_TAIL_LINES: usize = 10;

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
        }
    }

    /// Start a named step timer. Logs elapsed time at debug level on drop.
    #[must_use]
    pub fn timer(&self, label: &'static str) -> StepTimer {
        StepTimer::new(label)
    }

    fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::Compact)
    }

    fn key_value_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        if !self.no_header {
            table.set_header(["FIELD", "VALUE"]);
        }
        table
    }
}

// --- Run result ---

/// Write a completed run to stdout.
pub fn write_run_result(result: &RunResultOutput, ctx: &OutputCtx) {
    if ctx.is_json() {
        print_value(result, ctx);
        return;
    }

    let mut table = ctx.key_value_table();
    table.add_row(["tool", result.tool.as_str()]);
    table.add_row(["cmdline", result.cmdline.as_str()]);
    table.add_row([
        "return_code".to_owned(),
        result
            .return_code
            .map_or_else(|| "signal".to_owned(), |c| c.to_string()),
    ]);
    table.add_row(["duration".to_owned(), format!("{:.2}s", result.duration_secs)]);
    for output in &result.outputs {
        let mark = if output.exists { "" } else { " (missing)" };
        table.add_row([
            Cell::new(format!("outputs.{}", output.name)),
            Cell::new(format!("{}{mark}", output.path)),
        ]);
    }
    if !result.stdout.is_empty() {
        table.add_row(["stdout".to_owned(), tail(&result.stdout, TABLE_TAIL_LINES)]);
    }
    if !result.stderr.is_empty() {
        table.add_row(["stderr".to_owned(), tail(&result.stderr, TABLE_TAIL_LINES)]);
    }
    println!("{table}");
}

// --- Dry run ---

/// Write a dry-run plan to stdout.
pub fn write_dry_run(plan: &DryRunOutput, ctx: &OutputCtx) {
    if ctx.is_json() {
        print_value(plan, ctx);
    } else {
        println!("{}", plan.cmdline);
    }
}

// --- Check ---

/// Write an installation check report to stdout.
pub fn write_check(report: &CheckOutput, ctx: &OutputCtx) {
    if ctx.is_json() {
        print_value(report, ctx);
        return;
    }

    println!(
        "BROCCOLI_DIR: {}",
        report.broccoli_dir.as_deref().unwrap_or("(not set)")
    );
    println!("filters/: {}", yes_no(report.filters_dir));
    println!("brain_templates/: {}", yes_no(report.templates_dir));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["TOOL", "FOUND", "PATH"]);
    }
    for tool in &report.tools {
        table.add_row([
            tool.tool.as_str(),
            yes_no(tool.found),
            tool.path.as_deref().unwrap_or(""),
        ]);
    }
    println!("{table}");
}

// --- Interface documentation ---

/// Write interface documentation to stdout.
pub fn write_doc(doc: &InterfaceDoc, ctx: &OutputCtx) {
    if ctx.is_json() {
        print_value(doc, ctx);
    } else {
        print!("{}", render_help(doc));
    }
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let fmt = resolve_format(format, json_flag);
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    match fmt {
        OutputFormat::Json | OutputFormat::Compact => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(out, "{s}");
        }
        _ => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Step timer ---

/// A RAII timer that logs elapsed milliseconds on drop.
///
/// Created via [`OutputCtx::timer`]. Visible with `--debug` or `RUST_LOG=debug`.
pub struct StepTimer {
    label: &'static str,
    start: std::time::Instant,
}

impl StepTimer {
    #[must_use]
    fn new(label: &'static str) -> Self {
        Self {
            label,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for StepTimer {
    fn drop(&mut self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(step = self.label, "{ms:.2}ms");
    }
}

// --- Helpers ---

/// Last `n` lines of `text`.
#[must_use]
pub fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

fn print_value<T: Serialize + ?Sized>(value: &T, ctx: &OutputCtx) {
    let rendered = if ctx.format == OutputFormat::Compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!("JSON serialization error: {e}"),
    }
}
