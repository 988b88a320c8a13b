//! Tabular input port

use std::path::Path;

use crate::domain::result::Result;

/// Raw rows of a delimited file, header row first
pub type CsvRows = Vec<Vec<String>>;

/// Source of raw CSV rows
///
/// Implementations return every row unchanged, including the header row,
/// and accept ragged rows. A file that yields no rows at all is reported as
/// `Error::MalformedFile`.
pub trait CsvSource {
    fn read_rows(&self, path: &Path) -> Result<CsvRows>;
}
