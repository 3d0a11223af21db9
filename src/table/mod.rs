// src/table/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};
use tracing::{debug, instrument, warn};

use crate::error::MetaError;

mod preview;

pub const TAB: u8 = b'\t';
pub const COMMA: u8 = b',';

/// A delimited table held wholesale in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names, in order.
    pub headers: Vec<String>,
    /// Each row, as one String per column. Missing values are empty.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Load `path` in full; the first record names the columns.
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn read_delimited<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_reader(file, delimiter)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse an in-memory buffer whose first record is the header.
    pub fn from_text(text: &str, delimiter: u8) -> Result<Self> {
        Self::from_reader(text.as_bytes(), delimiter)
    }

    fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = rdr.records();
        let headers: Vec<String> = match records.next() {
            Some(record) => record
                .context("CSV parse error in header record")?
                .iter()
                .map(str::to_string)
                .collect(),
            None => return Ok(Self::default()),
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (idx, result) in records.enumerate() {
            let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let width = headers.len();
        for (idx, row) in rows.iter_mut().enumerate() {
            if row.len() > width {
                return Err(MetaError::RaggedRow {
                    row: idx,
                    fields: row.len(),
                    width,
                }
                .into());
            }
            // short rows are padded with missing values
            row.resize(width, String::new());
        }

        debug!(columns = width, rows = rows.len(), "loaded table");
        Ok(Self { headers, rows })
    }

    /// Write header and rows to `path`, no index column.
    #[instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn write_delimited<P: AsRef<Path>>(&self, path: P, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_to(file, delimiter)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn write_to<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(false)
            .from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, MetaError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| MetaError::MissingColumn {
                name: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Values of column `name`, top to bottom.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &str> + '_, MetaError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Replace column `name` if present, else append it as the last column.
    /// `values` must hold one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<(), MetaError> {
        if values.len() != self.rows.len() {
            return Err(MetaError::RowCount {
                column: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        match self.headers.iter().position(|h| h == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Take column `name` out and reinsert it at `index`.
    pub fn move_column(&mut self, name: &str, index: usize) -> Result<(), MetaError> {
        let from = self.column_index(name)?;
        let others = self.headers.len() - 1;
        if index > others {
            return Err(MetaError::ColumnPosition {
                name: name.to_string(),
                index,
                width: others,
            });
        }
        let header = self.headers.remove(from);
        self.headers.insert(index, header);
        for row in &mut self.rows {
            let value = row.remove(from);
            row.insert(index, value);
        }
        Ok(())
    }

    /// Drop the last `n` rows. A table shorter than `n` ends up empty.
    pub fn drop_tail(&mut self, n: usize) {
        if self.rows.len() < n {
            warn!(
                rows = self.rows.len(),
                trailer = n,
                "table is shorter than its trailer; no rows remain"
            );
        }
        let keep = self.rows.len().saturating_sub(n);
        self.rows.truncate(keep);
    }

    pub fn rename_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), MetaError> {
        if names.len() != self.headers.len() {
            return Err(MetaError::ColumnCount {
                expected: names.len(),
                actual: self.headers.len(),
            });
        }
        self.headers = names.iter().map(|n| n.as_ref().to_string()).collect();
        Ok(())
    }

    /// The first `n` rows as a new table.
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Aligned text rendering of the first `n` rows.
    pub fn preview(&self, n: usize) -> String {
        preview::render(&self.head(n))
    }
}
