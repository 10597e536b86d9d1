use crate::error::{CliError, CliResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowcheck_csvs::{write_table, write_table_to_writer, Row, Table};
use std::io;
use std::path::PathBuf;

/// Generate a deterministic integer table for benchmarking, optionally with
/// a fraction of corrupted rows
pub fn execute(
    rows: usize,
    columns: usize,
    seed: u64,
    invalid_rate: f64,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let table = generate_table(rows, columns, seed, invalid_rate)?;

    match output {
        Some(path) => {
            write_table(&path, &table, b',')?;
            eprintln!(
                "Generated {} rows of {} cells (seed {}, invalid rate {}) in {}",
                rows,
                columns,
                seed,
                invalid_rate,
                path.display()
            );
        }
        None => write_table_to_writer(io::stdout().lock(), &table, b',')?,
    }

    Ok(())
}

fn generate_table(rows: usize, columns: usize, seed: u64, invalid_rate: f64) -> CliResult<Table> {
    if columns == 0 {
        return Err(CliError::InvalidConfig(
            "columns must be at least 1".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&invalid_rate) {
        return Err(CliError::InvalidConfig(format!(
            "invalid rate must be between 0 and 1, got {}",
            invalid_rate
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut table_rows = Vec::with_capacity(rows);

    for i in 0..rows {
        let mut cells: Vec<String> = (0..columns)
            .map(|_| rng.gen_range(-1_000_000i64..=1_000_000).to_string())
            .collect();

        // Row 0 fixes the expected width, so it is never corrupted
        if i > 0 && rng.gen_bool(invalid_rate) {
            corrupt(&mut cells, &mut rng);
        }
        table_rows.push(Row::new(cells));
    }

    Ok(Table::new(table_rows))
}

// A single-cell row keeps its cell: popping it would write a blank line.
fn corrupt(cells: &mut Vec<String>, rng: &mut StdRng) {
    let column = rng.gen_range(0..cells.len());
    let wide = cells.len() > 1;
    match rng.gen_range(0..4) {
        0 if wide => {
            cells.pop();
        }
        1 => cells[column] = format!("{}.{}", rng.gen_range(0..100), rng.gen_range(0..100)),
        2 if wide => cells[column].clear(),
        _ => cells[column] = "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcheck_csvs::{read_table, ReadOptions};
    use rowcheck_engine::{EngineConfig, ValidationSession};
    use tempfile::NamedTempFile;

    #[test]
    fn test_same_seed_same_table() {
        let a = generate_table(50, 4, 42, 0.2).unwrap();
        let b = generate_table(50, 4, 42, 0.2).unwrap();
        let c = generate_table(50, 4, 43, 0.2).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_clean_fixtures_validate_clean() {
        let table = generate_table(200, 5, 1, 0.0).unwrap();
        let (summary, _) = ValidationSession::new(EngineConfig::default())
            .collect(&table)
            .unwrap();

        assert!(summary.is_clean());
        assert_eq!(summary.rows_checked, 200);
    }

    #[test]
    fn test_fully_corrupted_fixtures() {
        let table = generate_table(100, 3, 9, 1.0).unwrap();
        let (summary, _) = ValidationSession::new(EngineConfig::default())
            .collect(&table)
            .unwrap();

        // Every row but the first has exactly one problem
        assert_eq!(summary.diagnostics(), 99);
    }

    #[test]
    fn test_written_fixtures_read_back() {
        let temp_file = NamedTempFile::new().unwrap();
        execute(20, 3, 7, 0.5, Some(temp_file.path().to_path_buf())).unwrap();

        let table = read_table(temp_file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(table.len(), 20);
        assert_eq!(table.expected_width(), Some(3));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(matches!(
            generate_table(10, 0, 1, 0.0),
            Err(CliError::InvalidConfig(_))
        ));
        assert!(matches!(
            generate_table(10, 2, 1, 1.5),
            Err(CliError::InvalidConfig(_))
        ));
    }
}
