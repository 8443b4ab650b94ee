use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpinionError {
    #[error("Invalid granularity: {0} (expected day, week or month)")]
    InvalidGranularity(String),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Acquisition failed for {source_name}: {message}")]
    Acquisition { source_name: String, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type OpinionResult<T> = Result<T, OpinionError>;
