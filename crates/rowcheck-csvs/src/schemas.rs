/*!
# Table Model

[`Row`] and [`Table`] are the contract between the reader (producer) and the
validation engine (consumer). Both are read-only once built: nothing hands out
mutable access to cells, which is what lets the engine share one table across
worker threads without locking.
*/

use std::ops::Index;

// ================================================================================================
// Row
// ================================================================================================

/// One record: an ordered sequence of raw cell strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Number of cells in this row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self { cells }
    }
}

// ================================================================================================
// Table
// ================================================================================================

/// An ordered sequence of rows plus an optional, never-validated header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Option<Row>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            headers: None,
            rows,
        }
    }

    pub fn with_headers(headers: Row, rows: Vec<Row>) -> Self {
        Self {
            headers: Some(headers),
            rows,
        }
    }

    pub fn headers(&self) -> Option<&Row> {
        self.headers.as_ref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The column count every row is checked against: the width of the first row.
    ///
    /// `None` for an empty table.
    pub fn expected_width(&self) -> Option<usize> {
        self.rows.first().map(Row::len)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl Index<usize> for Table {
    type Output = Row;

    fn index(&self, index: usize) -> &Row {
        &self.rows[index]
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
