use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtliteError {
    /// A required field is missing, has the wrong type, or a payload shape is
    /// malformed. Rejects the whole request, never a single item.
    #[error("schema violation: {0}")]
    Schema(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("encoding error: {0}")]
    Encode(String),

    #[error("storage error: {0}")]
    Store(String),

    #[error("ingest error: {0}")]
    Ingest(String),

    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, OtliteError>;
