use thiserror::Error;

/// Notice shown when a CSV import cannot be read.
pub const IMPORT_FORMAT_HINT: &str = "Invalid CSV – use: Date,Branch,Size,RateType";

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid CSV – use: Date,Branch,Size,RateType ({0})")]
    ImportFormat(String),
    #[error("Invalid value `{value}` for {field}")]
    InvalidValue { field: &'static str, value: String },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
