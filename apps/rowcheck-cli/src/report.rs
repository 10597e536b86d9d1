/*!
# Reporting

Renders a run for humans (text) or machines (JSON). The engine has no idea
how its output looks; everything format-specific lives here.
*/

use rowcheck_engine::{Diagnostic, ValidationSummary};
use serde::Serialize;
use std::io::{self, Write};

/// Printed before dispatch
pub fn write_preamble<W: Write>(out: &mut W, workers: usize) -> io::Result<()> {
    writeln!(out, "Workers: {}", workers)?;
    writeln!(out, "Beginning validation...")
}

/// Printed after the join, always last
pub fn write_summary<W: Write>(out: &mut W, summary: &ValidationSummary) -> io::Result<()> {
    writeln!(out, "{}", summary)?;
    if !summary.is_clean() {
        writeln!(
            out,
            "Found {} problems: {} rows with the wrong width, {} cells that are not integers",
            summary.diagnostics(),
            summary.width_mismatches,
            summary.parse_errors
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub summary: &'a ValidationSummary,
    pub diagnostics: &'a [Diagnostic],
}

pub fn write_json<W: Write>(
    out: &mut W,
    summary: &ValidationSummary,
    diagnostics: &[Diagnostic],
) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport {
        summary,
        diagnostics,
    })?;
    writeln!(out).map_err(serde_json::Error::io)
}
