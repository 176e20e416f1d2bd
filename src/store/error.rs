//! Ledger Store Errors
//!
//! Error types for store operations.

/// Errors that can occur in the ledger store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key pointed at a missing row
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// The balance no longer matches the value the caller read
    #[error("Balance of account {account_id} changed since it was read")]
    StaleBalance { account_id: i64 },

    /// A value does not fit its numeric column
    #[error("Numeric value out of range: {0}")]
    NumericOverflow(String),

    /// A stored row could not be mapped back to a record
    #[error("Invalid row data: {0}")]
    InvalidRow(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Check if this error is a compare-and-swap failure
    pub fn is_stale_balance(&self) -> bool {
        matches!(self, StoreError::StaleBalance { .. })
    }
}

/// SQLSTATE `numeric_value_out_of_range`
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
            if db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) {
                return StoreError::NumericOverflow(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_classification() {
        let err = StoreError::StaleBalance { account_id: 3 };
        assert!(err.is_stale_balance());
        assert!(err.to_string().contains('3'));

        let err = StoreError::UniqueViolation("accounts_account_number_key".to_string());
        assert!(!err.is_stale_balance());
    }

    #[test]
    fn test_plain_sqlx_error_is_database() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
