//! Error types for the RFV pipeline

use thiserror::Error;

/// Failures raised while validating input or loading configuration.
///
/// Row numbers are zero-based positions in the input table.
#[derive(Error, Debug)]
pub enum RfvError {
    #[error("Transaction table is empty")]
    EmptyDataset,

    #[error("Required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("Missing value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: String, dtype: String },

    #[error("Invalid purchase date '{value}' at row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("Invalid line total '{value}' at row {row}")]
    InvalidAmount { row: usize, value: String },

    #[error("Reference date {reference} is earlier than the last purchase on {last_purchase}")]
    ReferenceBeforeLastPurchase {
        reference: chrono::NaiveDateTime,
        last_purchase: chrono::NaiveDateTime,
    },

    #[error("Invalid RFV score '{score}': expected three letters from A to D")]
    InvalidScore { score: String },

    #[error("Data frame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Action dictionary error: {0}")]
    Json(#[from] serde_json::Error),
}
