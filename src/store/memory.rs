//! In-memory ledger store
//!
//! Mirrors the SQL schema's constraints so handlers behave the same against
//! either backend. One write lock covers each mutation, which gives the
//! balance update and the transaction insert the same all-or-nothing
//! behavior as a SQL transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::domain::{
    fits_money_column, to_money, Account, Client, NewAccount, NewClient, NewTransaction, Transaction,
};

use super::{constraints, LedgerStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    clients: BTreeMap<i64, Client>,
    accounts: BTreeMap<i64, Account>,
    transactions: Vec<Transaction>,
    next_client_id: i64,
    next_account_id: i64,
    next_transaction_id: i64,
}

impl MemoryState {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    /// Compare-and-swap on an account balance.
    fn swap_balance(
        &mut self,
        account_id: i64,
        expected_balance: Decimal,
        new_balance: Decimal,
    ) -> StoreResult<&Account> {
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(StoreError::StaleBalance { account_id })?;

        if account.balance != expected_balance {
            return Err(StoreError::StaleBalance { account_id });
        }
        check_money_column(new_balance)?;

        account.balance = to_money(new_balance);
        Ok(account)
    }
}

/// Reject what `NUMERIC(18,2)` would reject.
fn check_money_column(value: Decimal) -> StoreResult<()> {
    if fits_money_column(to_money(value)) {
        Ok(())
    } else {
        Err(StoreError::NumericOverflow(value.to_string()))
    }
}

/// Process-local `LedgerStore`
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    state: RwLock<MemoryState>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn insert_client(&self, client: NewClient) -> StoreResult<Client> {
        let mut state = self.state.write().await;

        let duplicate = state
            .clients
            .values()
            .any(|c| c.name == client.name && c.date_of_birth == client.date_of_birth);
        if duplicate {
            return Err(StoreError::UniqueViolation(constraints::CLIENT_IDENTITY.to_string()));
        }

        let id = MemoryState::next_id(&mut state.next_client_id);
        let record = Client {
            id,
            name: client.name,
            date_of_birth: client.date_of_birth,
            gender: client.gender,
            income: to_money(client.income),
        };
        state.clients.insert(id, record.clone());

        Ok(record)
    }

    async fn find_client(&self, client_id: i64) -> StoreResult<Option<Client>> {
        Ok(self.state.read().await.clients.get(&client_id).cloned())
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut state = self.state.write().await;

        if state
            .accounts
            .values()
            .any(|a| a.account_number == account.account_number)
        {
            return Err(StoreError::UniqueViolation(constraints::ACCOUNT_NUMBER.to_string()));
        }
        if !state.clients.contains_key(&account.client_id) {
            return Err(StoreError::ForeignKeyViolation(constraints::ACCOUNT_CLIENT.to_string()));
        }
        check_money_column(account.opening_balance)?;

        let id = MemoryState::next_id(&mut state.next_account_id);
        let record = Account {
            id,
            account_number: account.account_number,
            balance: to_money(account.opening_balance),
            created_at: account.created_at,
            client_id: account.client_id,
        };
        state.accounts.insert(id, record.clone());

        Ok(record)
    }

    async fn find_account(&self, account_number: &str) -> StoreResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    async fn append_transaction(
        &self,
        expected_balance: Decimal,
        transaction: NewTransaction,
    ) -> StoreResult<Transaction> {
        let mut state = self.state.write().await;

        if !state.accounts.contains_key(&transaction.account_id) {
            return Err(StoreError::ForeignKeyViolation(
                constraints::TRANSACTION_ACCOUNT.to_string(),
            ));
        }

        state.swap_balance(
            transaction.account_id,
            expected_balance,
            transaction.balance_after_transaction,
        )?;

        let id = MemoryState::next_id(&mut state.next_transaction_id);
        let record = Transaction {
            id,
            account_id: transaction.account_id,
            kind: transaction.kind,
            amount: to_money(transaction.amount),
            balance_after_transaction: to_money(transaction.balance_after_transaction),
            transaction_date: transaction.transaction_date,
        };
        state.transactions.push(record.clone());

        Ok(record)
    }

    async fn update_balance(
        &self,
        account_id: i64,
        expected_balance: Decimal,
        new_balance: Decimal,
    ) -> StoreResult<Account> {
        let mut state = self.state.write().await;
        let account = state.swap_balance(account_id, expected_balance, new_balance)?;
        Ok(account.clone())
    }

    async fn list_transactions(&self, account_id: i64) -> StoreResult<Vec<Transaction>> {
        let state = self.state.read().await;
        let mut log: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        log.sort_by(|a, b| {
            a.transaction_date
                .cmp(&b.transaction_date)
                .then(a.id.cmp(&b.id))
        });
        Ok(log)
    }
}
