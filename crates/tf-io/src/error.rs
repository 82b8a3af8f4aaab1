//! I/O-subsystem error type.

use thiserror::Error;

/// Errors produced by `tf-io`.
#[derive(Debug, Error)]
pub enum IoError {
    /// A record line is structurally wrong: bad tuple syntax, wrong field
    /// count, or a non-numeric field.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

pub type IoResult<T> = Result<T, IoError>;
