//! Command Handlers module
//!
//! Handlers that validate commands and apply them to the ledger store.

mod account_handler;
mod commands;
mod customer_handler;
mod interest_applicator;
mod transaction_registrar;

pub use account_handler::CreateAccountHandler;
pub use commands::*;
pub use customer_handler::CustomerHandler;
pub use interest_applicator::InterestApplicator;
pub use transaction_registrar::TransactionRegistrar;

use crate::domain::DomainError;
use crate::error::AppError;
use crate::store::StoreError;

/// Map a lost compare-and-swap to a conflict on `account_number`.
fn balance_conflict(account_number: &str) -> impl FnOnce(StoreError) -> AppError + '_ {
    move |err| match err {
        StoreError::StaleBalance { account_id } => {
            tracing::warn!(
                account_id,
                account_number,
                "Balance changed concurrently, write discarded"
            );
            DomainError::BalanceConflict(account_number.to_string()).into()
        }
        other => other.into(),
    }
}
