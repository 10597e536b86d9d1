/*!
# Record Reading & Writing

Turns a line-oriented, delimiter-separated text stream into a [`Table`].

Reading follows a plain split-on-delimiter contract: every physical line is
one row, so row indices line up with line numbers (after headers and comment
lines). Lines end at `\n` with one trailing `\r` stripped; any other `\r`
stays in its cell. A blank line is a row with a single empty cell. Quotes are
just bytes, and bytes that are not valid UTF-8 are replaced with U+FFFD so the
bad cell fails to parse instead of failing the read. Rows with the wrong number
of cells are kept as-is and left for the validation engine to report.

Writing goes through the `csv` writer with quoting disabled.
*/

use crate::{
    errors::{CsvError, CsvResult},
    schemas::{Row, Table},
};
use csv::{QuoteStyle, WriterBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Tokenizer settings for reading a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Cell separator
    pub delimiter: u8,

    /// Treat the first line as a header row (kept on the table, never validated)
    pub has_headers: bool,

    /// Lines starting with this byte are skipped entirely
    pub comment: Option<u8>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            comment: None,
        }
    }
}

impl ReadOptions {
    fn check(&self) -> CsvResult<()> {
        if matches!(self.delimiter, b'\n' | b'\r') {
            return Err(CsvError::InvalidOptions(
                "delimiter cannot be a line terminator".to_string(),
            ));
        }
        if self.comment == Some(self.delimiter) {
            return Err(CsvError::InvalidOptions(format!(
                "comment byte '{}' is also the delimiter",
                self.delimiter as char
            )));
        }
        Ok(())
    }

    fn is_comment(&self, line: &[u8]) -> bool {
        matches!((self.comment, line.first()), (Some(c), Some(&b)) if c == b)
    }

    fn split_line(&self, line: &[u8]) -> Row {
        line.split(|&b| b == self.delimiter)
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect()
    }
}

// ================================================================================================
// Reading
// ================================================================================================

/// Read a table from a file on disk
pub fn read_table<P: AsRef<Path>>(path: P, options: &ReadOptions) -> CsvResult<Table> {
    let file = File::open(path)?;
    read_table_from_reader(file, options)
}

/// Read a table from any byte stream (stdin, a file, an in-memory buffer)
pub fn read_table_from_reader<R: Read>(reader: R, options: &ReadOptions) -> CsvResult<Table> {
    options.check()?;

    let mut headers = None;
    let mut rows = Vec::new();

    // `split` yields no empty segment after a final `\n`
    for line in BufReader::new(reader).split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if options.is_comment(&line) {
            continue;
        }

        let row = options.split_line(&line);
        if options.has_headers && headers.is_none() {
            headers = Some(row);
        } else {
            rows.push(row);
        }
    }

    Ok(match headers {
        Some(headers) => Table::with_headers(headers, rows),
        None => Table::new(rows),
    })
}

// ================================================================================================
// Writing
// ================================================================================================

/// Write a table to a file, header row first if present
pub fn write_table<P: AsRef<Path>>(path: P, table: &Table, delimiter: u8) -> CsvResult<()> {
    let file = File::create(path)?;
    write_table_to_writer(file, table, delimiter)
}

pub fn write_table_to_writer<W: Write>(writer: W, table: &Table, delimiter: u8) -> CsvResult<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    if let Some(headers) = table.headers() {
        wtr.write_record(headers.iter())?;
    }
    for row in table {
        wtr.write_record(row.iter())?;
    }

    wtr.flush()?;
    Ok(())
}

// ================================================================================================
// Tests
// ================================================================================================
