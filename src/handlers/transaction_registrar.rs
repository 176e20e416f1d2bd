//! Transaction Registrar
//!
//! Records deposits and withdrawals. The balance update and the ledger
//! entry are written together or not at all.

use chrono::Utc;

use crate::domain::{Amount, DomainError, NewTransaction, OperationContext, Transaction};
use crate::error::AppResult;
use crate::projection::BalanceResolver;
use crate::store::SharedStore;

use super::{balance_conflict, RegisterTransactionCommand};

/// Handler for deposits and withdrawals
pub struct TransactionRegistrar {
    store: SharedStore,
    balances: BalanceResolver,
}

impl TransactionRegistrar {
    pub fn new(store: SharedStore) -> Self {
        Self {
            balances: BalanceResolver::new(store.clone()),
            store,
        }
    }

    /// Execute the register transaction command
    pub async fn execute(
        &self,
        command: RegisterTransactionCommand,
        context: &OperationContext,
    ) -> AppResult<Transaction> {
        let amount = Amount::new(command.amount).map_err(DomainError::from)?;

        let account = self.balances.resolve_account(&command.account_number).await?;
        let current_balance = account.balance;

        let new_balance = match command.kind.apply(current_balance, &amount) {
            Ok(balance) => balance,
            Err(err) => {
                tracing::info!(
                    account_number = %account.account_number,
                    kind = %command.kind,
                    requested = %amount,
                    available = %current_balance,
                    reason = %err,
                    correlation_id = ?context.correlation_id,
                    "Transaction rejected"
                );
                return Err(err.into());
            }
        };

        let transaction = self
            .store
            .append_transaction(
                current_balance,
                NewTransaction {
                    account_id: account.id,
                    kind: command.kind,
                    amount: amount.value(),
                    balance_after_transaction: new_balance,
                    transaction_date: Utc::now(),
                },
            )
            .await
            .map_err(balance_conflict(&account.account_number))?;

        tracing::info!(
            transaction_id = transaction.id,
            account_number = %account.account_number,
            kind = %transaction.kind,
            amount = %transaction.amount,
            balance = %transaction.balance_after_transaction,
            correlation_id = ?context.correlation_id,
            "Transaction registered"
        );

        Ok(transaction)
    }
}
