//! The module contains the error the engine can throw.
//!
//! Every error is recoverable at the [`Session`] boundary: the session leaves
//! the registry untouched and the caller reports the failure to the customer.
//! The errors are:
//!
//! - [`InvalidCredentials`] thrown when no account matches number and PIN.
//! - [`CardExpired`] thrown when the matching card is past its expiration.
//! - [`AccountNotFound`] thrown when a target account number is unknown.
//! - [`InvalidAmount`] thrown for non-positive amounts, amounts that can't be
//!   paid in notes or amounts larger than the balance.
//!
//!  [`Session`]: crate::Session
//!  [`InvalidCredentials`]: EngineError::InvalidCredentials
//!  [`CardExpired`]: EngineError::CardExpired
//!  [`AccountNotFound`]: EngineError::AccountNotFound
//!  [`InvalidAmount`]: EngineError::InvalidAmount
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Card expired")]
    CardExpired,
    #[error("\"{0}\" account not found!")]
    AccountNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Source and destination are the same account")]
    SelfTransfer,
    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("I/O failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
