//! CSV file reader backed by the `csv` crate

use std::io::Read;
use std::path::Path;

use crate::domain::result::{Error, Result};
use crate::ports::{CsvRows, CsvSource};

/// Reads comma separated files with optional quoting
///
/// The header row is returned as an ordinary row; rows may have any number
/// of cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFileSource;

impl CsvFileSource {
    pub fn new() -> Self {
        Self
    }

    /// Read rows from any reader
    pub fn read_from<R: Read>(&self, input: R) -> Result<CsvRows> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        if rows.is_empty() {
            return Err(Error::malformed("file contains no rows"));
        }
        Ok(rows)
    }
}

impl CsvSource for CsvFileSource {
    fn read_rows(&self, path: &Path) -> Result<CsvRows> {
        let file = std::fs::File::open(path)?;
        self.read_from(file)
    }
}
