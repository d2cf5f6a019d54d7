//! Centralized error types for the stake reconciler

use thiserror::Error;

/// Main reconciliation error type
#[derive(Error, Debug)]
pub enum SyncError {
    /// An on-chain read failed or timed out. Never causes a cache write;
    /// the whole operation is safe to retry.
    #[error("Transient RPC failure: {0}")]
    Transient(String),

    #[error("Invalid account data for {account_type}: {reason}")]
    Decode {
        account_type: &'static str,
        reason: String,
    },

    /// The decoded on-chain staker does not match the claimed wallet.
    /// A security boundary, never swallowed.
    #[error("Ownership mismatch: account is owned by {found}, caller claimed {claimed}")]
    OwnershipMismatch { claimed: String, found: String },

    #[error("Stake account {stake_account} references no known pool")]
    NoMatchingPool { stake_account: String },

    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for reconciler operations
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Transient failures leave the cache untouched and the whole
    /// operation may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Transient(_))
    }
}

/// Helper to convert sqlx errors
impl From<sqlx::Error> for SyncError {
    fn from(err: sqlx::Error) -> Self {
        SyncError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for SyncError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SyncError::Storage(err.to_string())
    }
}
