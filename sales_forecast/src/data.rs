//! Raw tabular input as uploaded by the user
//!
//! A [`RawTable`] keeps every cell as an untyped string. Typing happens
//! later in the normalizer, so a bad cell is reported against its row
//! rather than failing the whole load.

use crate::error::{ForecastError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Ordered rows of untyped cells addressed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from in-memory rows. Every row must have one cell per header.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut table_rows = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            let cells: Vec<String> = row.into_iter().map(Into::into).collect();
            if cells.len() != headers.len() {
                return Err(ForecastError::InvalidParameter(format!(
                    "Row {} has {} cells but the header has {} columns",
                    i,
                    cells.len(),
                    headers.len()
                )));
            }
            table_rows.push(cells);
        }

        Ok(Self {
            headers,
            rows: table_rows,
        })
    }

    /// Read a CSV document with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Load a CSV file from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Build a table from a polars DataFrame, rendering every cell as text
    #[cfg(feature = "polars")]
    pub fn from_dataframe(df: &polars::prelude::DataFrame) -> Result<Self> {
        use polars::prelude::AnyValue;

        let headers: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let mut cells = Vec::with_capacity(headers.len());
            for series in df.get_columns() {
                let cell = match series.get(i)? {
                    AnyValue::Null => String::new(),
                    AnyValue::Utf8(s) => s.to_string(),
                    other => other.to_string(),
                };
                cells.push(cell);
            }
            rows.push(cells);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of a column in the header, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of data rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text, or `None` when the cell is empty
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// All cells of the named column in row order
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some((0..self.rows.len()).map(|r| self.cell(r, idx)).collect())
    }
}
