//! Error types for the porting analytics engine

use thiserror::Error;

use crate::period::Period;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Upstream row is missing a column or carries a malformed value
    #[error("input shape error at row {row}: {message}")]
    InputShape { row: usize, message: String },

    /// No transactions at all, so no target month can be derived
    #[error("no porting transactions to build from")]
    NoData,

    /// The resolved target month has no matching transactions
    #[error("no porting transactions for target month {period}")]
    EmptyTarget { period: Period },

    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error("invalid recommendation policy: {0}")]
    Policy(String),

    /// A bundle sink could not store its output
    #[error("bundle sink error: {0}")]
    Sink(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
