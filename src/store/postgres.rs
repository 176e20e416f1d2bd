//! PostgreSQL ledger store
//!
//! Tables are defined in `migrations/001_initial.sql`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{Account, Client, NewAccount, NewClient, NewTransaction, Transaction, TransactionKind};

use super::{LedgerStore, StoreError, StoreResult};

type ClientRow = (i64, String, NaiveDate, String, Decimal);
type AccountRow = (i64, String, Decimal, DateTime<Utc>, i64);
type TransactionRow = (i64, i64, String, Decimal, Decimal, DateTime<Utc>);

fn client_from_row((id, name, date_of_birth, gender, income): ClientRow) -> Client {
    Client {
        id,
        name,
        date_of_birth,
        gender,
        income,
    }
}

fn account_from_row((id, account_number, balance, created_at, client_id): AccountRow) -> Account {
    Account {
        id,
        account_number,
        balance,
        created_at,
        client_id,
    }
}

fn transaction_from_row(row: TransactionRow) -> StoreResult<Transaction> {
    let (id, account_id, kind, amount, balance_after_transaction, transaction_date) = row;
    let kind: TransactionKind = kind
        .parse()
        .map_err(|_| StoreError::InvalidRow(format!("transaction {} has type '{}'", id, kind)))?;

    Ok(Transaction {
        id,
        account_id,
        kind,
        amount,
        balance_after_transaction,
        transaction_date,
    })
}

/// `LedgerStore` backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn insert_client(&self, client: NewClient) -> StoreResult<Client> {
        let row: ClientRow = sqlx::query_as(
            r#"
            INSERT INTO clients (name, date_of_birth, gender, income)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, date_of_birth, gender, income
            "#,
        )
        .bind(&client.name)
        .bind(client.date_of_birth)
        .bind(&client.gender)
        .bind(client.income)
        .fetch_one(&self.pool)
        .await?;

        Ok(client_from_row(row))
    }

    async fn find_client(&self, client_id: i64) -> StoreResult<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as(
            "SELECT id, name, date_of_birth, gender, income FROM clients WHERE id = $1",
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(client_from_row))
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (account_number, balance, created_at, client_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_number, balance, created_at, client_id
            "#,
        )
        .bind(&account.account_number)
        .bind(account.opening_balance)
        .bind(account.created_at)
        .bind(account.client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(account_from_row(row))
    }

    async fn find_account(&self, account_number: &str) -> StoreResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, account_number, balance, created_at, client_id
            FROM accounts
            WHERE account_number = $1
            "#,
        )
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(account_from_row))
    }

    async fn append_transaction(
        &self,
        expected_balance: Decimal,
        transaction: NewTransaction,
    ) -> StoreResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = $2
            WHERE id = $1 AND balance = $3
            "#,
        )
        .bind(transaction.account_id)
        .bind(transaction.balance_after_transaction)
        .bind(expected_balance)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            tx.rollback().await?;
            return Err(StoreError::StaleBalance {
                account_id: transaction.account_id,
            });
        }

        let row: TransactionRow = sqlx::query_as(
            r#"
            INSERT INTO transactions
                (account_id, transaction_type, amount, balance_after_transaction, transaction_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, account_id, transaction_type, amount, balance_after_transaction, transaction_date
            "#,
        )
        .bind(transaction.account_id)
        .bind(transaction.kind.as_str())
        .bind(transaction.amount)
        .bind(transaction.balance_after_transaction)
        .bind(transaction.transaction_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            account_id = transaction.account_id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            balance = %transaction.balance_after_transaction,
            "Transaction appended"
        );

        transaction_from_row(row)
    }

    async fn update_balance(
        &self,
        account_id: i64,
        expected_balance: Decimal,
        new_balance: Decimal,
    ) -> StoreResult<Account> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            UPDATE accounts
            SET balance = $2
            WHERE id = $1 AND balance = $3
            RETURNING id, account_number, balance, created_at, client_id
            "#,
        )
        .bind(account_id)
        .bind(new_balance)
        .bind(expected_balance)
        .fetch_optional(&self.pool)
        .await?;

        row.map(account_from_row)
            .ok_or(StoreError::StaleBalance { account_id })
    }

    async fn list_transactions(&self, account_id: i64) -> StoreResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, transaction_type, amount, balance_after_transaction, transaction_date
            FROM transactions
            WHERE account_id = $1
            ORDER BY transaction_date ASC, id ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(transaction_from_row).collect()
    }
}
