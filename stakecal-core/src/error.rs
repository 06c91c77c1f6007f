//! Error types for the stakecal ecosystem.

use thiserror::Error;

/// Failure of a ledger read. This is the only error reconciliation produces.
#[derive(Error, Debug)]
pub enum LedgerReadError {
    #[error("Ledger provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Ledger request timed out after {0}s")]
    Timeout(u64),

    #[error("Ledger provider error: {0}")]
    Provider(String),

    #[error("Malformed ledger data: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur in stakecal operations.
#[derive(Error, Debug)]
pub enum StakeCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid identity: {0:?}")]
    InvalidIdentity(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0} has no calendar open")]
    NoCalendar(String),

    #[error(transparent)]
    LedgerRead(#[from] LedgerReadError),

    #[error("Transaction failed: {0}")]
    LedgerWrite(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for stakecal operations.
pub type StakeCalResult<T> = Result<T, StakeCalError>;
