//! Ledger records
//!
//! Clients, accounts and the append-only transaction log, as read back from
//! the ledger store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{check_balance_limit, Amount, DomainError};

/// A registered customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub income: Decimal,
}

/// Validated input for a new client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub income: Decimal,
}

/// An account: the materialized fold of its transaction log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub account_number: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub client_id: i64,
}

/// Validated input for a new account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub account_number: String,
    pub opening_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub client_id: i64,
}

/// Kind of a ledger movement.
///
/// Interest credits are not recorded as movements (see `InterestApplicator`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }

    /// Balance after applying `amount` of this kind to `current`.
    ///
    /// Withdrawals may bring the balance to exactly zero, never below.
    /// Deposits may not push it past the money column's maximum.
    pub fn apply(&self, current: Decimal, amount: &Amount) -> Result<Decimal, DomainError> {
        match self {
            TransactionKind::Deposit => check_balance_limit(current.checked_add(amount.value())),
            TransactionKind::Withdrawal => {
                if !amount.is_covered_by(current) {
                    return Err(DomainError::insufficient_funds(amount.value(), current));
                }
                Ok(current - amount.value())
            }
        }
    }

    /// Signed contribution of `amount` to the balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Deposit => amount,
            TransactionKind::Withdrawal => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Deposit" => Ok(TransactionKind::Deposit),
            "Withdrawal" => Ok(TransactionKind::Withdrawal),
            other => Err(DomainError::validation(format!("Unknown transaction type: {}", other))),
        }
    }
}

/// An immutable ledger entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub balance_after_transaction: Decimal,
    pub transaction_date: DateTime<Utc>,
}

/// A movement about to be appended to an account's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: i64,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub balance_after_transaction: Decimal,
    pub transaction_date: DateTime<Utc>,
}
