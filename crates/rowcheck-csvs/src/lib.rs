/*!
# rowcheck Table Model & Record Reading

This crate owns the **data model** that every other rowcheck crate reads from,
and the thin input layer that produces it.

## Data Model

- [`Row`]: an ordered sequence of cell strings, immutable once read
- [`Table`]: an ordered sequence of rows; the expected column count of a table
  is the cell count of its first row

## Input Contract

One physical line is one row and cells are split on the delimiter (`,` by
default). There is no quoting or escaping. Record widths are **not** enforced
here; a short or long row is data for the validator to report, not a read
error.

## Usage

```rust,no_run
use rowcheck_csvs::{read_table, ReadOptions, CsvResult};

fn example() -> CsvResult<()> {
    let table = read_table("data.csv", &ReadOptions::default())?;
    println!("{} rows, {:?} columns", table.len(), table.expected_width());
    Ok(())
}
```
*/

pub mod errors;
pub mod reader;
pub mod schemas;

// Re-export main types for convenience
pub use errors::{CsvError, CsvResult};
pub use reader::{read_table, read_table_from_reader, write_table, write_table_to_writer, ReadOptions};
pub use schemas::{Row, Table};
