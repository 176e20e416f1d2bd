//! Projection module
//!
//! Read-side views of the ledger: current balance, history and summary.

mod balance;
mod history;

pub use balance::BalanceResolver;
pub use history::{AccountSummary, HistoryProjector, TransactionSummary};
