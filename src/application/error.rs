use thiserror::Error;

use crate::domain::AccountError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Invalid account type '{0}'. Valid types: account, checking, savings")]
    InvalidAccountType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Source and destination are the same account: {0}")]
    SameAccount(String),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
