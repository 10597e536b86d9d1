use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;

/// Why a cell failed to parse as a base-10 `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailure {
    Empty,
    InvalidDigit,
    OutOfRange,
}

impl From<&IntErrorKind> for ParseFailure {
    fn from(kind: &IntErrorKind) -> Self {
        match kind {
            IntErrorKind::Empty => ParseFailure::Empty,
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParseFailure::OutOfRange,
            _ => ParseFailure::InvalidDigit,
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseFailure::Empty => "empty cell",
            ParseFailure::InvalidDigit => "invalid syntax",
            ParseFailure::OutOfRange => "value out of range",
        };
        f.write_str(text)
    }
}

/// One data-quality finding.
///
/// Row indices are absolute positions in the table, never partition-local.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    RowWidthMismatch {
        row: usize,
        actual: usize,
        expected: usize,
    },
    CellParseError {
        row: usize,
        column: usize,
        raw: String,
        reason: ParseFailure,
    },
}

impl Diagnostic {
    pub fn row(&self) -> usize {
        match self {
            Diagnostic::RowWidthMismatch { row, .. } | Diagnostic::CellParseError { row, .. } => *row,
        }
    }

    /// Column of a cell error; `None` for a whole-row width mismatch
    pub fn column(&self) -> Option<usize> {
        match self {
            Diagnostic::RowWidthMismatch { .. } => None,
            Diagnostic::CellParseError { column, .. } => Some(*column),
        }
    }

    pub fn is_width_mismatch(&self) -> bool {
        matches!(self, Diagnostic::RowWidthMismatch { .. })
    }

    /// Sort key placing a row's width mismatch before any of its cell errors
    pub fn position(&self) -> (usize, Option<usize>) {
        (self.row(), self.column())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RowWidthMismatch {
                row,
                actual,
                expected,
            } => write!(f, "Row {} has {} cells, but expected {}", row, actual, expected),
            Diagnostic::CellParseError {
                row,
                column,
                raw,
                reason,
            } => write!(f, "Err at ({}, {}): parsing {:?}: {}", column, row, raw, reason),
        }
    }
}
