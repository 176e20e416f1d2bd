//! History / Summary Projector
//!
//! Read views over an account's transaction log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Transaction, TransactionKind};
use crate::error::AppResult;
use crate::store::SharedStore;

use super::BalanceResolver;

/// One line of an account's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub transaction_type: TransactionKind,
    pub amount: Decimal,
    pub balance_after_transaction: Decimal,
    pub transaction_date: DateTime<Utc>,
}

impl From<&Transaction> for TransactionSummary {
    fn from(tx: &Transaction) -> Self {
        Self {
            transaction_type: tx.kind,
            amount: tx.amount,
            balance_after_transaction: tx.balance_after_transaction,
            transaction_date: tx.transaction_date,
        }
    }
}

/// Current balance together with the ordered history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub account_number: String,
    pub current_balance: Decimal,
    pub transactions: Vec<TransactionSummary>,
}

/// Projects history and summaries from the ledger store
#[derive(Clone)]
pub struct HistoryProjector {
    store: SharedStore,
    balances: BalanceResolver,
}

impl HistoryProjector {
    pub fn new(store: SharedStore) -> Self {
        Self {
            balances: BalanceResolver::new(store.clone()),
            store,
        }
    }

    /// All transactions of the account, oldest first.
    ///
    /// Equal timestamps keep insertion order. Every call reads the log
    /// afresh.
    pub async fn get_history(&self, account_number: &str) -> AppResult<Vec<Transaction>> {
        let account = self.balances.resolve_account(account_number).await?;
        let transactions = self.store.list_transactions(account.id).await?;

        tracing::debug!(
            account_number = %account.account_number,
            count = transactions.len(),
            "History loaded"
        );

        Ok(transactions)
    }

    /// Account number, current balance and history summaries.
    pub async fn get_summary(&self, account_number: &str) -> AppResult<AccountSummary> {
        let history = self.get_history(account_number).await?;
        let transactions = history.iter().map(TransactionSummary::from).collect();

        let account = self.balances.resolve_account(account_number).await?;

        Ok(AccountSummary {
            account_number: account.account_number,
            current_balance: account.balance,
            transactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, NewTransaction};
    use crate::error::AppError;
    use crate::handlers::test_support::seed_account;
    use crate::store::MemoryLedgerStore;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_history_sorted_when_inserted_out_of_order() {
        let store: SharedStore = Arc::new(MemoryLedgerStore::new());
        let account = seed_account(&store, "ACC300", dec!(0)).await;

        let base = Utc::now();
        let offsets = [Duration::hours(2), Duration::hours(-3), Duration::hours(0)];
        let mut balance = dec!(0);
        for (i, offset) in offsets.iter().enumerate() {
            let amount = Decimal::from(i as i64 + 1);
            let next = balance + amount;
            store
                .append_transaction(
                    balance,
                    NewTransaction {
                        account_id: account.id,
                        kind: TransactionKind::Deposit,
                        amount,
                        balance_after_transaction: next,
                        transaction_date: base + *offset,
                    },
                )
                .await
                .unwrap();
            balance = next;
        }

        let projector = HistoryProjector::new(store);
        let history = projector.get_history("ACC300").await.unwrap();

        assert_eq!(history.len(), 3);
        assert!(history
            .windows(2)
            .all(|w| w[0].transaction_date <= w[1].transaction_date));
        let amounts: Vec<Decimal> = history.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![dec!(2), dec!(3), dec!(1)]);
    }

    #[tokio::test]
    async fn test_history_is_restartable() {
        let store: SharedStore = Arc::new(MemoryLedgerStore::new());
        let account = seed_account(&store, "ACC301", dec!(10)).await;
        store
            .append_transaction(
                dec!(10),
                NewTransaction {
                    account_id: account.id,
                    kind: TransactionKind::Withdrawal,
                    amount: dec!(4),
                    balance_after_transaction: dec!(6),
                    transaction_date: Utc::now(),
                },
            )
            .await
            .unwrap();

        let projector = HistoryProjector::new(store);
        let first = projector.get_history("ACC301").await.unwrap();
        let second = projector.get_history("ACC301").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_summary_of_empty_account() {
        let store: SharedStore = Arc::new(MemoryLedgerStore::new());
        seed_account(&store, "ACC302", dec!(75.5)).await;

        let summary = HistoryProjector::new(store).get_summary("ACC302").await.unwrap();
        assert_eq!(summary.account_number, "ACC302");
        assert_eq!(summary.current_balance, dec!(75.50));
        assert!(summary.transactions.is_empty());
    }

    #[tokio::test]
    async fn test_history_of_unknown_account() {
        let store: SharedStore = Arc::new(MemoryLedgerStore::new());
        let err = HistoryProjector::new(store)
            .get_summary("NOPE")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::AccountNotFound(_))));
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = TransactionSummary {
            transaction_type: TransactionKind::Deposit,
            amount: dec!(50.00),
            balance_after_transaction: dec!(250.00),
            transaction_date: Utc::now(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["transactionType"], "Deposit");
        assert_eq!(json["balanceAfterTransaction"], "250.00");
    }
}
