/*!
# Diagnostic Sinks

The sink is the only mutable state shared between workers. Every
implementation must be safe to call from many threads at once, hence the
`Sync` bound on [`DiagnosticSink`]; the provided sinks serialize appends
through a mutex so no diagnostic is lost or duplicated.
*/

use crate::diagnostic::Diagnostic;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

/// Append-only destination for diagnostics, shared across workers
pub trait DiagnosticSink: Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

// A worker that panicked mid-append cannot leave a half-pushed entry behind, so
// the guarded data is still usable after poisoning.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

// ================================================================================================
// CollectingSink
// ================================================================================================

/// Buffers every diagnostic in memory; drain it after the join
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock_recovering(&self.diagnostics).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of everything collected so far, in arrival order
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        lock_recovering(&self.diagnostics).clone()
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        match self.diagnostics.into_inner() {
            Ok(diagnostics) => diagnostics,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Collected diagnostics ordered by row, then column
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut diagnostics = self.into_inner();
        diagnostics.sort_by_key(Diagnostic::position);
        diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        lock_recovering(&self.diagnostics).push(diagnostic);
    }
}

// ================================================================================================
// WriterSink
// ================================================================================================

#[derive(Debug)]
struct WriterState<W> {
    writer: W,
    written: usize,
    error: Option<io::Error>,
}

/// Streams each diagnostic as one rendered line as soon as it is emitted.
///
/// Write failures do not interrupt validation; the first one is kept and
/// returned from [`WriterSink::finish`].
#[derive(Debug)]
pub struct WriterSink<W: Write + Send> {
    state: Mutex<WriterState<W>>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new(WriterState {
                writer,
                written: 0,
                error: None,
            }),
        }
    }

    /// Lines successfully written so far
    pub fn written(&self) -> usize {
        lock_recovering(&self.state).written
    }

    /// Flush and hand back the writer, or the first write error seen
    pub fn finish(self) -> io::Result<W> {
        let mut state = match self.state.into_inner() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(err) = state.error.take() {
            return Err(err);
        }
        state.writer.flush()?;
        Ok(state.writer)
    }
}

impl<W: Write + Send> DiagnosticSink for WriterSink<W> {
    fn emit(&self, diagnostic: Diagnostic) {
        let mut state = lock_recovering(&self.state);
        if state.error.is_some() {
            return;
        }
        match writeln!(state.writer, "{}", diagnostic) {
            Ok(()) => state.written += 1,
            Err(err) => state.error = Some(err),
        }
    }
}
