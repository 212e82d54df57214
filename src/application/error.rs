use thiserror::Error;

use crate::domain::Amount;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {amount} ({reason})")]
    InvalidAmount { amount: Amount, reason: String },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
