//! Error type for the Ewert solver.
//!
//! Non-convergence is not an error: a loop that hits its iteration cap
//! returns its final state normally.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EwertError {
    /// An input is outside its physical bounds. Raised before any iteration runs.
    #[error("invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// An intermediate quantity became NaN or infinite during an iteration.
    #[error("numeric degeneracy at iteration {iteration}: {quantity} = {value}")]
    NumericDegeneracy {
        iteration: u32,
        quantity: &'static str,
        value: f64,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EwertResult<T> = Result<T, EwertError>;

impl EwertError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        EwertError::InvalidInput {
            field,
            value,
            reason,
        }
    }
}
