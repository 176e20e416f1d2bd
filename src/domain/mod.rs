//! Domain module
//!
//! Core domain types and business rules of the ledger.

pub mod amount;
pub mod context;
pub mod error;
pub mod records;

pub use amount::{
    fits_money_column, max_amount, non_negative_money, to_money, Amount, AmountError, InterestRate,
    MAX_INTEREST_RATE, MONEY_SCALE,
};
pub use context::OperationContext;
pub use error::{check_balance_limit, require_account_number, DomainError};
pub use records::{Account, Client, NewAccount, NewClient, NewTransaction, Transaction, TransactionKind};
