//! Service layer - business logic orchestration
//!
//! Column resolution, slip building and validation are pure functions over
//! the field table; the import session ties them together for one file.

pub mod import;
pub mod logging;
pub mod mapping;
pub mod normalize;
pub mod validation;

pub use import::{ImportOutcome, ImportPhase, ImportService, ImportSession};
pub use logging::{EventTotal, LogEntry, LogEvent, LoggingService};
pub use mapping::{find_match, resolve, ColumnMapping, MappedColumn};
pub use normalize::{build, normalize_currency, normalize_sin};
pub use validation::{validate, validate_batch, ValidationVerdict};
