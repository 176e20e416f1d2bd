//! Command definitions
//!
//! Commands represent intentions to change the ledger. Values arrive
//! unvalidated; each handler enforces the rules for its command.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::TransactionKind;

/// Command to register a new customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerCommand {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub income: Decimal,
}

impl CreateCustomerCommand {
    pub fn new(name: String, date_of_birth: NaiveDate, gender: String, income: Decimal) -> Self {
        Self {
            name,
            date_of_birth,
            gender,
            income,
        }
    }
}

/// Command to open an account for an existing customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountCommand {
    pub account_number: String,
    pub client_id: i64,
    /// Opening balance
    pub balance: Decimal,
    /// Defaults to now when absent
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateAccountCommand {
    pub fn new(account_number: String, client_id: i64, balance: Decimal) -> Self {
        Self {
            account_number,
            client_id,
            balance,
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Command to record a deposit or withdrawal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTransactionCommand {
    pub account_number: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
}

impl RegisterTransactionCommand {
    pub fn new(account_number: String, kind: TransactionKind, amount: Decimal) -> Self {
        Self {
            account_number,
            kind,
            amount,
        }
    }

    pub fn deposit(account_number: impl Into<String>, amount: Decimal) -> Self {
        Self::new(account_number.into(), TransactionKind::Deposit, amount)
    }

    pub fn withdrawal(account_number: impl Into<String>, amount: Decimal) -> Self {
        Self::new(account_number.into(), TransactionKind::Withdrawal, amount)
    }
}

/// Command to credit interest to an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyInterestCommand {
    pub account_number: String,
    /// Percentage, `5` means 5%
    pub annual_rate: Decimal,
}

impl ApplyInterestCommand {
    pub fn new(account_number: String, annual_rate: Decimal) -> Self {
        Self {
            account_number,
            annual_rate,
        }
    }
}
