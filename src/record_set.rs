use log::trace;
use crate::error::{NormalizeError, Result};

/// A cell value. `None` marks a missing value.
pub type Cell = Option<String>;

/// In-memory table of rows sharing the header's named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordSet {
    /// Every row must have exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == headers.len()));
        RecordSet { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| NormalizeError::MissingColumn(name.to_string()))
    }

    /// Replaces every value of column `name` with `f(value)`.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> Result<()>
    where
        F: FnMut(Cell) -> Cell,
    {
        let index = self.column_index(name)?;
        for row in &mut self.rows {
            let value = row[index].take();
            row[index] = f(value);
        }
        Ok(())
    }

    /// Substring replacement over every header name.
    pub fn rename_headers(&mut self, from: &str, to: &str) {
        for header in &mut self.headers {
            if header.contains(from) {
                let renamed = header.replace(from, to);
                trace!("Renaming column '{}' to '{}'", header, renamed);
                *header = renamed;
            }
        }
    }

    /// Keeps only the rows whose value in column `name` satisfies `keep`.
    /// Returns the number of rows removed.
    pub fn retain_rows<F>(&mut self, name: &str, mut keep: F) -> Result<usize>
    where
        F: FnMut(Option<&str>) -> bool,
    {
        let index = self.column_index(name)?;
        let before = self.rows.len();
        self.rows.retain(|row| keep(row[index].as_deref()));
        Ok(before - self.rows.len())
    }

    pub fn drop_last_row(&mut self) -> Option<Vec<Cell>> {
        self.rows.pop()
    }
}
