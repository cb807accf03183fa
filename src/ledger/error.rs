//! Ledger Store Errors
//!
//! Error types for ledger store operations.

use uuid::Uuid;

/// SQLSTATE for a violated CHECK constraint
const CHECK_VIOLATION: &str = "23514";

/// SQLSTATE for a violated UNIQUE constraint
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE raised when a serializable transaction loses a conflict
const SERIALIZATION_FAILURE: &str = "40001";

/// SQLSTATE raised when the deadlock detector aborts a transaction
const DEADLOCK_DETECTED: &str = "40P01";

/// Name of the CHECK constraint that keeps wallet balances non-negative
pub const BALANCE_CONSTRAINT: &str = "wallets_balance_non_negative";

/// Errors that can occur in the ledger store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A debit would have made a wallet balance negative
    #[error("Balance constraint violated: wallet balance cannot go negative")]
    BalanceConstraint,

    /// The transaction lost a serializable conflict and was aborted
    #[error("Serialization failure: concurrent transaction conflict")]
    SerializationFailure,

    /// Username already registered (case-insensitive)
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Employee has no wallet row
    #[error("Wallet not found for employee {0}")]
    WalletMissing(Uuid),

    /// Store could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Row content violates a domain invariant
    #[error("Invalid ledger data: {0}")]
    InvalidData(String),

    /// Any other database error
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Check if re-running the whole transaction may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::SerializationFailure)
    }

    /// Map a unique violation on the username index to `UsernameTaken`
    pub(crate) fn for_username(self, username: &str) -> Self {
        match self {
            StoreError::Database(ref err) if sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::UsernameTaken(username.to_string())
            }
            other => other,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match sqlstate(&err).as_deref() {
            Some(CHECK_VIOLATION) if violated_constraint(&err) == Some(BALANCE_CONSTRAINT) => {
                StoreError::BalanceConstraint
            }
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                StoreError::SerializationFailure
            }
            _ => StoreError::Database(err),
        }
    }
}

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    err.as_database_error().and_then(|db| db.constraint())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_serialization_failure_is_retryable() {
        assert!(StoreError::SerializationFailure.is_retryable());
        assert!(!StoreError::BalanceConstraint.is_retryable());
        assert!(!StoreError::Unavailable("down".to_string()).is_retryable());
    }

    #[test]
    fn test_non_database_errors_stay_generic() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));

        let err = StoreError::from(sqlx::Error::PoolTimedOut).for_username("alice");
        assert!(matches!(err, StoreError::Database(_)));
    }
}
