use thiserror::Error;

/// Errors raised while flattening catalog records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// A required field is absent, named by its path in the source record.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Malformed release date: {0:?}")]
    MalformedDate(String),

    /// The raw value does not have the shape of the source record at all.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

impl From<serde_json::Error> for NormalizeError {
    fn from(err: serde_json::Error) -> Self {
        NormalizeError::MalformedRecord(err.to_string())
    }
}
