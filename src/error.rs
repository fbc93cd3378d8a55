//! Error types for the quiz core

use thiserror::Error;

/// Result type alias using QuizError.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors raised by the quiz core and its loaders/stores.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("no vocabulary available to sample from")]
    EmptyPool,

    #[error("weighted pool total does not fit in usize")]
    PoolOverflow,

    #[error("need {needed} distractors but only {available} candidates are available")]
    InsufficientDistractors { needed: usize, available: usize },

    #[error("result record {position} has a missing or invalid `{field}`")]
    MalformedRecord { position: usize, field: &'static str },

    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("missing column '{0}' in file header")]
    MissingColumn(String),

    #[error("empty file - no header row")]
    EmptyFile,

    #[error("no sheets found in Excel file")]
    NoSheets,

    #[error("failed to read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read Excel file: {0}")]
    Excel(#[from] calamine::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
