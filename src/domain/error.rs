//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;

use super::{fits_money_column, max_amount, AmountError};

/// Business rule violations and missing-entity failures of the ledger.
///
/// These are independent of the web/infrastructure layer; the API maps them
/// to status codes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Withdrawal larger than the current balance
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Decimal, available: Decimal },

    /// Invalid amount (zero, negative, or too precise)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid interest rate
    #[error("Invalid interest rate: {0}")]
    InvalidRate(String),

    /// Malformed or missing field
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Client not found: {0}")]
    ClientNotFound(i64),

    #[error("Account number already exists: {0}")]
    DuplicateAccountNumber(String),

    #[error("Client already registered: {0}")]
    DuplicateClient(String),

    /// The balance changed between read and write (optimistic locking)
    #[error("Balance of account {0} was modified concurrently")]
    BalanceConflict(String),

    /// Resulting balance does not fit the money column
    #[error("Resulting balance exceeds the maximum of {0}")]
    BalanceLimitExceeded(Decimal),
}

impl DomainError {
    /// Create an insufficient funds error
    pub fn insufficient_funds(requested: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds { requested, available }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Balance beyond what the money column holds
    pub fn balance_limit_exceeded() -> Self {
        Self::BalanceLimitExceeded(max_amount())
    }
}

/// Accept `balance` only if it fits the money column.
pub fn check_balance_limit(balance: Option<Decimal>) -> Result<Decimal, DomainError> {
    balance
        .filter(|b| fits_money_column(*b))
        .ok_or_else(DomainError::balance_limit_exceeded)
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        DomainError::InvalidAmount(err.to_string())
    }
}

/// Reject empty or whitespace-only account numbers.
pub fn require_account_number(account_number: &str) -> Result<&str, DomainError> {
    let trimmed = account_number.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Account number is required"));
    }
    Ok(trimmed)
}
