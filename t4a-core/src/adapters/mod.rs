//! Adapter implementations
//!
//! - Local CSV files for the CsvSource port

pub mod csv_file;

pub use csv_file::CsvFileSource;
