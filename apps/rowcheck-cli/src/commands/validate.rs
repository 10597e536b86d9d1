use crate::config::{OutputFormat, ValidateConfig, ValidateOverrides, ValidateSettings};
use crate::error::CliResult;
use crate::report;
use rowcheck_csvs::{read_table, read_table_from_reader, Table};
use rowcheck_engine::{EngineError, ValidationSession, ValidationSummary, WriterSink};
use std::io::{self, LineWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Validate a table from a file or stdin
pub fn execute(
    input: Option<PathBuf>,
    config: Option<PathBuf>,
    overrides: ValidateOverrides,
) -> CliResult<()> {
    let file_config = match &config {
        Some(path) => {
            info!("Loading settings from {}", path.display());
            ValidateConfig::load(path)?
        }
        None => ValidateConfig::default(),
    };
    let settings = ValidateSettings::resolve(file_config, &overrides)?;

    // A failed read stops here, before any partitioning
    let table = match input.filter(|path| path.as_os_str() != "-") {
        Some(path) => {
            info!("Reading {}", path.display());
            read_table(&path, &settings.read)?
        }
        None => {
            info!("Reading stdin");
            read_table_from_reader(io::stdin().lock(), &settings.read)?
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&table, &settings, &mut out, LineWriter::new(io::stderr()))?;
    out.flush()?;
    Ok(())
}

/// Validate an already-read table, writing the report to `out` and, in text
/// mode, streaming diagnostics to `diagnostics_out`
pub fn run<W, E>(
    table: &Table,
    settings: &ValidateSettings,
    out: &mut W,
    diagnostics_out: E,
) -> CliResult<ValidationSummary>
where
    W: Write,
    E: Write + Send,
{
    if table.is_empty() {
        return Err(EngineError::EmptyTable.into());
    }

    let session = ValidationSession::new(settings.engine.clone());

    match settings.format {
        OutputFormat::Text => {
            report::write_preamble(out, settings.engine.resolved_workers().get())?;
            out.flush()?;

            let sink = WriterSink::new(diagnostics_out);
            let summary = session.run(table, &sink)?;
            sink.finish()?;

            report::write_summary(out, &summary)?;
            Ok(summary)
        }
        OutputFormat::Json => {
            let (summary, diagnostics) = session.collect(table)?;
            report::write_json(out, &summary, &diagnostics)?;
            Ok(summary)
        }
    }
}
