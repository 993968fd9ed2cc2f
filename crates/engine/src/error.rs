//! The module contains the error the engine can throw.
//!
//! The two domain errors callers are expected to branch on are:
//!
//! - [`InsufficientFunds`] thrown when an outcome exceeds the current balance.
//! - [`KeyNotFound`] thrown when an item is not found.
//!
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid kind: {0}")]
    InvalidKind(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
