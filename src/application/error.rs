use thiserror::Error;

use crate::domain::{ExpenseId, TotalError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing Idempotency-Key")]
    MissingKey,

    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),

    #[error("Total out of range: {0}")]
    TotalOverflow(#[from] TotalError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
