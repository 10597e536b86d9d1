/*!
# Parallel Dispatch

One scoped worker thread per non-empty partition, all spawned up front, then a
single join. `std::thread::scope` is the completion barrier: it cannot return
while any worker is still running, so the caller never sees a report for
in-flight work.

A worker that panics is a bug in the engine (or in a sink), not bad data, and
comes back as [`EngineError::WorkerPanicked`] after every other worker has
been joined.
*/

use crate::error::{EngineError, EngineResult};
use crate::partition::PartitionPlan;
use crate::sink::DiagnosticSink;
use crate::validator::{validate_rows, PartitionStats};
use rowcheck_csvs::Table;
use std::any::Any;
use std::ops::Range;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What one worker did
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    /// Index of the partition in the plan
    pub partition: usize,
    pub range: Range<usize>,
    pub stats: PartitionStats,
    pub started: Instant,
    pub finished: Instant,
}

/// Outcomes of every worker, in partition order
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<PartitionOutcome>,
}

impl DispatchReport {
    /// Number of workers that ran
    pub fn workers_spawned(&self) -> usize {
        self.outcomes.len()
    }

    pub fn totals(&self) -> PartitionStats {
        self.outcomes
            .iter()
            .fold(PartitionStats::default(), |acc, o| acc + o.stats)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Validate every partition of `plan` concurrently and wait for all of them.
pub fn run_parallel<S>(
    table: &Table,
    plan: &PartitionPlan,
    expected: usize,
    sink: &S,
) -> EngineResult<DispatchReport>
where
    S: DiagnosticSink + ?Sized,
{
    let views = plan.views(table.rows())?;
    let active = plan.non_empty().count();

    info!(
        "Dispatching {} rows across {} workers ({} partitions planned)",
        table.len(),
        active,
        plan.partitions()
    );

    let joined: Vec<(usize, EngineResult<PartitionOutcome>)> = thread::scope(|s| {
        let mut handles = Vec::with_capacity(active);
        let mut failures: Vec<(usize, EngineResult<PartitionOutcome>)> = Vec::new();

        for (partition, view) in views.into_iter().enumerate() {
            if view.is_empty() {
                continue;
            }

            let spawned = thread::Builder::new()
                .name(format!("rowcheck-worker-{}", partition))
                .spawn_scoped(s, move || {
                    let started = Instant::now();
                    let stats = validate_rows(view, expected, sink);
                    let finished = Instant::now();

                    debug!(
                        "Partition {} checked rows {:?}: {} diagnostics",
                        partition,
                        view.range(),
                        stats.diagnostics()
                    );

                    PartitionOutcome {
                        partition,
                        range: view.range(),
                        stats,
                        started,
                        finished,
                    }
                });

            match spawned {
                Ok(handle) => handles.push((partition, handle)),
                Err(err) => failures.push((
                    partition,
                    Err(EngineError::WorkerSpawn {
                        partition,
                        message: err.to_string(),
                    }),
                )),
            }
        }

        // Join every handle, even after a failure, so no worker outlives the scope
        // with its result unobserved.
        let mut joined: Vec<_> = handles
            .into_iter()
            .map(|(partition, handle)| {
                let result = handle.join().map_err(|payload| EngineError::WorkerPanicked {
                    partition,
                    message: panic_message(&*payload),
                });
                (partition, result)
            })
            .collect();
        joined.extend(failures);
        joined
    });

    let mut report = DispatchReport {
        outcomes: Vec::with_capacity(joined.len()),
    };
    let mut first_error = None;

    for (partition, result) in joined {
        match result {
            Ok(outcome) => report.outcomes.push(outcome),
            Err(err) => {
                warn!("Partition {} did not complete: {}", partition, err);
                first_error.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }

    report.outcomes.sort_by_key(|o| o.partition);

    info!(
        "All {} workers finished: {} diagnostics",
        report.workers_spawned(),
        report.totals().diagnostics()
    );

    Ok(report)
}
