/*!
# rowcheck Validation Engine

Checks every row of a [`Table`](rowcheck_csvs::Table) for a fixed column count
and every cell for a base-10 integer, using one worker thread per core.

## Pipeline

1. **Partition**: cut the rows into `n` contiguous blocks whose sizes differ by at most one
2. **Dispatch**: spawn one scoped worker per non-empty block, each borrowing its block read-only
3. **Join**: wait for every worker; only then is a [`ValidationSummary`] produced

Diagnostics stream into a caller-supplied [`DiagnosticSink`] while workers
run. They are findings about the data, never errors: a run over a table full
of bad cells still returns `Ok`.

## Quick Start

```rust
use rowcheck_csvs::{read_table_from_reader, ReadOptions};
use rowcheck_engine::{EngineConfig, ValidationSession};

# fn example() -> Result<(), Box<dyn std::error::Error>> {
let table = read_table_from_reader("1,2,3\n4,x,6\n7,8\n".as_bytes(), &ReadOptions::default())?;

let session = ValidationSession::new(EngineConfig::default());
let (summary, diagnostics) = session.collect(&table)?;

assert_eq!(summary.rows_checked, 3);
assert_eq!(diagnostics.len(), 2);
# Ok(())
# }
```

## Streaming

```rust
use rowcheck_engine::{EngineConfig, ValidationSession, WriterSink};
# use rowcheck_csvs::{Row, Table};

# fn example() -> Result<(), Box<dyn std::error::Error>> {
# let table: Table = vec![Row::from_iter(["1"])].into();
let sink = WriterSink::new(std::io::stderr());
let summary = ValidationSession::new(EngineConfig::default()).run(&table, &sink)?;
sink.finish()?;
println!("{}", summary);
# Ok(())
# }
```
*/

mod config;
mod diagnostic;
mod dispatcher;
mod error;
mod partition;
mod session;
mod sink;
mod validator;

pub use config::{available_cores, EngineConfig};
pub use diagnostic::{Diagnostic, ParseFailure};
pub use dispatcher::{run_parallel, DispatchReport, PartitionOutcome};
pub use error::{EngineError, EngineResult};
pub use partition::{partition, PartitionPlan};
pub use session::{ValidationSession, ValidationSummary};
pub use sink::{CollectingSink, DiagnosticSink, WriterSink};
pub use validator::{parse_cell, validate_rows, PartitionStats, RowView};
