//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// The file yielded no rows at all
    #[error("Malformed file: {0}")]
    MalformedFile(String),

    /// A mapping referenced a field path that is not in the field table
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A mapping referenced a header that is not in the file
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Operation not allowed in the session's current phase
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid amount: {0}")]
    Currency(String),

    #[error("Field table error: {0}")]
    FieldTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedFile(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::UnknownColumn("Box 99".to_string());
        assert_eq!(err.to_string(), "Unknown column: Box 99");

        let err = Error::malformed("no rows");
        assert!(err.to_string().starts_with("Malformed file"));
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
