//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The import
//! services depend only on these traits, not on concrete implementations.

mod csv_source;

pub use csv_source::{CsvRows, CsvSource};
