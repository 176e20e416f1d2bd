//! Interest Applicator
//!
//! Credits interest to an account. The credit changes the stored balance
//! only; no ledger entry is appended, so the log of an account that has
//! received interest no longer folds to its balance.

use crate::domain::{check_balance_limit, Account, DomainError, InterestRate, OperationContext};
use crate::error::AppResult;
use crate::projection::BalanceResolver;
use crate::store::SharedStore;

use super::{balance_conflict, ApplyInterestCommand};

/// Handler for interest credits
pub struct InterestApplicator {
    store: SharedStore,
    balances: BalanceResolver,
}

impl InterestApplicator {
    pub fn new(store: SharedStore) -> Self {
        Self {
            balances: BalanceResolver::new(store.clone()),
            store,
        }
    }

    /// Execute the apply interest command
    pub async fn execute(
        &self,
        command: ApplyInterestCommand,
        context: &OperationContext,
    ) -> AppResult<Account> {
        let rate = InterestRate::new(command.annual_rate)
            .map_err(|e| DomainError::InvalidRate(e.to_string()))?;

        let account = self.balances.resolve_account(&command.account_number).await?;
        let current_balance = account.balance;
        let interest = rate.interest_on(current_balance).ok_or_else(|| {
            DomainError::InvalidRate(format!("{}% overflows on balance {}", rate, current_balance))
        })?;
        let new_balance = check_balance_limit(current_balance.checked_add(interest))?;

        let updated = self
            .store
            .update_balance(account.id, current_balance, new_balance)
            .await
            .map_err(balance_conflict(&account.account_number))?;

        tracing::info!(
            account_number = %updated.account_number,
            rate = %rate,
            interest = %interest,
            balance = %updated.balance,
            correlation_id = ?context.correlation_id,
            "Interest applied"
        );

        Ok(updated)
    }
}
