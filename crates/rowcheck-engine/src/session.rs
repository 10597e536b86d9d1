use crate::config::EngineConfig;
use crate::diagnostic::Diagnostic;
use crate::dispatcher::run_parallel;
use crate::error::{EngineError, EngineResult};
use crate::partition::PartitionPlan;
use crate::sink::{CollectingSink, DiagnosticSink};
use rowcheck_csvs::Table;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

/// Result of one validation run, produced after every worker has finished
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub rows_checked: usize,

    /// Column count every row was checked against
    pub column_width: usize,

    /// Requested worker count
    pub workers: usize,

    /// Workers that actually ran (non-empty partitions)
    pub partitions: usize,

    pub width_mismatches: usize,
    pub parse_errors: usize,

    /// Wall time of dispatch and join only
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
}

impl ValidationSummary {
    pub fn diagnostics(&self) -> usize {
        self.width_mismatches + self.parse_errors
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics() == 0
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validated {} rows of {} cells in {:?}",
            self.rows_checked, self.column_width, self.elapsed
        )
    }
}

/// Orchestrates one run: size the pool, partition, dispatch, join, summarize
#[derive(Debug, Clone, Default)]
pub struct ValidationSession {
    config: EngineConfig,
}

impl ValidationSession {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `table`, streaming diagnostics into `sink`.
    ///
    /// Every diagnostic has been emitted by the time this returns. An empty
    /// table is rejected before any partitioning happens.
    pub fn run<S>(&self, table: &Table, sink: &S) -> EngineResult<ValidationSummary>
    where
        S: DiagnosticSink + ?Sized,
    {
        let expected = table.expected_width().ok_or(EngineError::EmptyTable)?;
        let workers = self.config.resolved_workers();
        let plan = PartitionPlan::for_table(table, workers);

        let start = Instant::now();
        let report = run_parallel(table, &plan, expected, sink)?;
        let elapsed = start.elapsed();

        let totals = report.totals();
        let summary = ValidationSummary {
            rows_checked: totals.rows_checked,
            column_width: expected,
            workers: workers.get(),
            partitions: report.workers_spawned(),
            width_mismatches: totals.width_mismatches,
            parse_errors: totals.parse_errors,
            elapsed,
        };

        info!("{} ({} diagnostics)", summary, summary.diagnostics());
        Ok(summary)
    }

    /// Run with an in-memory sink and return diagnostics sorted by position
    pub fn collect(&self, table: &Table) -> EngineResult<(ValidationSummary, Vec<Diagnostic>)> {
        let sink = CollectingSink::new();
        let summary = self.run(table, &sink)?;
        Ok((summary, sink.into_sorted()))
    }
}
