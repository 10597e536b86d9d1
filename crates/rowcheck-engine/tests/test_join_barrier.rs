use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowcheck_csvs::{Row, Table};
use rowcheck_engine::{partition, run_parallel, Diagnostic, DiagnosticSink};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Slows workers down and records when each diagnostic landed
#[derive(Default)]
struct SlowRecordingSink {
    emitted: AtomicUsize,
    stamps: Mutex<Vec<Instant>>,
}

impl DiagnosticSink for SlowRecordingSink {
    fn emit(&self, _diagnostic: Diagnostic) {
        thread::sleep(Duration::from_micros(200));
        self.stamps.lock().unwrap().push(Instant::now());
        self.emitted.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_join_returns_only_after_every_worker_finished() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let len = rng.gen_range(1..300);
        let workers = rng.gen_range(1..16);

        // Every row is bad, so every worker has real work to do in the sink
        let table: Table = (0..len).map(|_| Row::from_iter(["x", "1"])).collect();
        let plan = partition(table.len(), NonZeroUsize::new(workers).unwrap());
        let sink = SlowRecordingSink::default();

        let report = run_parallel(&table, &plan, 2, &sink).unwrap();
        let returned = Instant::now();

        assert_eq!(report.workers_spawned(), workers.min(len));
        assert_eq!(sink.emitted.load(Ordering::SeqCst), len);
        for outcome in &report.outcomes {
            assert!(outcome.started <= outcome.finished);
            assert!(outcome.finished <= returned);
            assert_eq!(outcome.stats.rows_checked, outcome.range.len());
        }
        for stamp in sink.stamps.lock().unwrap().iter() {
            assert!(*stamp <= returned);
        }
    }
}
