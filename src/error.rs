use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoClassError {
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid vector length: expected {expected}, got {actual}")]
    InvalidVectorLength { expected: usize, actual: usize },

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Classifier has not been fitted")]
    NotFitted,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvoClassError>;
