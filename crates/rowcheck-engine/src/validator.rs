use crate::diagnostic::{Diagnostic, ParseFailure};
use crate::sink::DiagnosticSink;
use rowcheck_csvs::Row;
use std::ops::{Add, AddAssign, Range};

/// A borrowed block of rows that remembers where it starts in the full table
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    offset: usize,
    rows: &'a [Row],
}

impl<'a> RowView<'a> {
    pub fn new(offset: usize, rows: &'a [Row]) -> Self {
        Self { offset, rows }
    }

    /// Absolute index of the first row in this view
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rows(&self) -> &'a [Row] {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Absolute index range this view covers
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.rows.len()
    }
}

/// Per-partition tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub rows_checked: usize,
    pub width_mismatches: usize,
    pub parse_errors: usize,
}

impl PartitionStats {
    pub fn diagnostics(&self) -> usize {
        self.width_mismatches + self.parse_errors
    }
}

impl Add for PartitionStats {
    type Output = PartitionStats;

    fn add(self, rhs: PartitionStats) -> PartitionStats {
        PartitionStats {
            rows_checked: self.rows_checked + rhs.rows_checked,
            width_mismatches: self.width_mismatches + rhs.width_mismatches,
            parse_errors: self.parse_errors + rhs.parse_errors,
        }
    }
}

impl AddAssign for PartitionStats {
    fn add_assign(&mut self, rhs: PartitionStats) {
        *self = *self + rhs;
    }
}

/// Parse a cell as a base-10 `i64`: optional sign, digits only
pub fn parse_cell(cell: &str) -> Result<i64, ParseFailure> {
    cell.parse::<i64>()
        .map_err(|err| ParseFailure::from(err.kind()))
}

/// Check every row of `view` against `expected` columns, emitting one
/// diagnostic per violation in row-then-column order.
///
/// A row of the wrong width gets a single width diagnostic and its cells are
/// skipped: with no column alignment there is nothing meaningful to check.
pub fn validate_rows<S>(view: RowView<'_>, expected: usize, sink: &S) -> PartitionStats
where
    S: DiagnosticSink + ?Sized,
{
    let mut stats = PartitionStats::default();

    for (local, row) in view.rows().iter().enumerate() {
        let row_index = view.offset() + local;
        stats.rows_checked += 1;

        if row.len() != expected {
            sink.emit(Diagnostic::RowWidthMismatch {
                row: row_index,
                actual: row.len(),
                expected,
            });
            stats.width_mismatches += 1;
            continue;
        }

        for (column, cell) in row.iter().enumerate() {
            if let Err(reason) = parse_cell(cell) {
                sink.emit(Diagnostic::CellParseError {
                    row: row_index,
                    column,
                    raw: cell.to_string(),
                    reason,
                });
                stats.parse_errors += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;

    fn rows(lines: &[&[&str]]) -> Vec<Row> {
        lines.iter().map(|cells| Row::from_iter(cells.iter().copied())).collect()
    }

    #[test]
    fn test_parse_cell_accepts_signed_integers() {
        assert_eq!(parse_cell("42"), Ok(42));
        assert_eq!(parse_cell("+7"), Ok(7));
        assert_eq!(parse_cell("-13"), Ok(-13));
        assert_eq!(parse_cell("007"), Ok(7));
        assert_eq!(parse_cell(&i64::MAX.to_string()), Ok(i64::MAX));
        assert_eq!(parse_cell(&i64::MIN.to_string()), Ok(i64::MIN));
    }

    #[test]
    fn test_parse_cell_rejects_non_integers() {
        assert_eq!(parse_cell(""), Err(ParseFailure::Empty));
        assert_eq!(parse_cell("+"), Err(ParseFailure::InvalidDigit));
        assert_eq!(parse_cell("-"), Err(ParseFailure::InvalidDigit));
        assert_eq!(parse_cell("1.0"), Err(ParseFailure::InvalidDigit));
        assert_eq!(parse_cell(" 1"), Err(ParseFailure::InvalidDigit));
        assert_eq!(parse_cell("1 "), Err(ParseFailure::InvalidDigit));
        assert_eq!(parse_cell("0x10"), Err(ParseFailure::InvalidDigit));
        assert_eq!(parse_cell("9223372036854775808"), Err(ParseFailure::OutOfRange));
    }

    #[test]
    fn test_clean_rows_emit_nothing() {
        let data = rows(&[&["1", "2", "3"], &["-4", "+5", "6"]]);
        let sink = CollectingSink::new();

        let stats = validate_rows(RowView::new(0, &data), 3, &sink);

        assert!(sink.is_empty());
        assert_eq!(stats.rows_checked, 2);
        assert_eq!(stats.diagnostics(), 0);
    }

    #[test]
    fn test_bad_cell_reports_column() {
        let data = rows(&[&["1", "2", "x"]]);
        let sink = CollectingSink::new();

        let stats = validate_rows(RowView::new(0, &data), 3, &sink);

        assert_eq!(stats.parse_errors, 1);
        assert_eq!(
            sink.into_inner(),
            vec![Diagnostic::CellParseError {
                row: 0,
                column: 2,
                raw: "x".to_string(),
                reason: ParseFailure::InvalidDigit,
            }]
        );
    }

    #[test]
    fn test_width_mismatch_skips_cells() {
        let data = rows(&[&["1", "x"]]);
        let sink = CollectingSink::new();

        let stats = validate_rows(RowView::new(0, &data), 3, &sink);

        assert_eq!(stats.width_mismatches, 1);
        assert_eq!(stats.parse_errors, 0);
        assert_eq!(
            sink.into_inner(),
            vec![Diagnostic::RowWidthMismatch {
                row: 0,
                actual: 2,
                expected: 3,
            }]
        );
    }

    #[test]
    fn test_row_indices_are_absolute() {
        let data = rows(&[&["1", "2"], &["a", "b"], &["3"]]);
        let sink = CollectingSink::new();

        validate_rows(RowView::new(100, &data), 2, &sink);

        let found = sink.into_inner();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].position(), (101, Some(0)));
        assert_eq!(found[1].position(), (101, Some(1)));
        assert_eq!(found[2].position(), (102, None));
    }

    #[test]
    fn test_stats_add_up() {
        let a = PartitionStats {
            rows_checked: 3,
            width_mismatches: 1,
            parse_errors: 2,
        };
        let mut total = PartitionStats::default();
        total += a;
        total += a;
        assert_eq!(total.rows_checked, 6);
        assert_eq!(total.diagnostics(), 6);
    }
}
