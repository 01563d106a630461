//! Error types for settle-up.

use thiserror::Error;

/// Result type alias for settle-up operations
pub type Result<T> = std::result::Result<T, SettleError>;

/// Errors that can occur while loading records or settling balances.
#[derive(Error, Debug)]
pub enum SettleError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expense record with a missing or invalid field.
    ///
    /// `record` is the 1-based position of the record in the input.
    #[error("Invalid expense record {record}: field `{field}` {message}")]
    Validation {
        record: usize,
        field: &'static str,
        message: String,
    },

    /// Pop from an empty priority queue
    #[error("Cannot pop from an empty priority queue")]
    EmptyContainer,

    /// Missing input file argument
    #[error("Missing input file argument. Usage: settle-up <records.csv|records.json>")]
    MissingArgument,
}

impl SettleError {
    /// Builds a `Validation` error for the given record and field.
    pub fn validation(record: usize, field: &'static str, message: impl Into<String>) -> Self {
        SettleError::Validation {
            record,
            field,
            message: message.into(),
        }
    }
}
