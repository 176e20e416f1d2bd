//! Ledger Store module
//!
//! Persistence for clients, accounts and the transaction log.
//! `PgLedgerStore` is the production backend; `MemoryLedgerStore` keeps the
//! same constraints in process memory for tests and local runs.

mod error;
mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Account, Client, NewAccount, NewClient, NewTransaction, Transaction};

pub use error::StoreError;
pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Constraint names shared by both backends (see `migrations/001_initial.sql`).
pub mod constraints {
    pub const CLIENT_IDENTITY: &str = "clients_name_date_of_birth_key";
    pub const ACCOUNT_NUMBER: &str = "accounts_account_number_key";
    pub const ACCOUNT_CLIENT: &str = "accounts_client_id_fkey";
    pub const TRANSACTION_ACCOUNT: &str = "transactions_account_id_fkey";
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage for the ledger.
///
/// Balance mutations are compare-and-swap: they only apply when the stored
/// balance still equals `expected_balance`, otherwise they fail with
/// `StoreError::StaleBalance` and leave no trace.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Insert a client, enforcing the name + date of birth uniqueness.
    async fn insert_client(&self, client: NewClient) -> StoreResult<Client>;

    async fn find_client(&self, client_id: i64) -> StoreResult<Option<Client>>;

    /// Insert an account. Fails on duplicate number or unknown client.
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account>;

    async fn find_account(&self, account_number: &str) -> StoreResult<Option<Account>>;

    /// Append a transaction and move the account balance to its
    /// `balance_after_transaction`, as one atomic unit of work.
    async fn append_transaction(
        &self,
        expected_balance: Decimal,
        transaction: NewTransaction,
    ) -> StoreResult<Transaction>;

    /// Set the balance without writing a transaction.
    async fn update_balance(
        &self,
        account_id: i64,
        expected_balance: Decimal,
        new_balance: Decimal,
    ) -> StoreResult<Account>;

    /// All transactions of an account, oldest first, ties broken by id.
    async fn list_transactions(&self, account_id: i64) -> StoreResult<Vec<Transaction>>;
}

/// Store handle shared by the request handlers
pub type SharedStore = Arc<dyn LedgerStore>;
