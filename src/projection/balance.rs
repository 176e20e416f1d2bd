//! Balance Resolver
//!
//! The stored `accounts.balance` column is the authoritative balance; it is
//! never recomputed from the transaction log here.

use rust_decimal::Decimal;

use crate::domain::{require_account_number, Account, DomainError};
use crate::error::AppResult;
use crate::store::SharedStore;

/// Resolves accounts and their current balance by account number
#[derive(Clone)]
pub struct BalanceResolver {
    store: SharedStore,
}

impl BalanceResolver {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Load the account, failing with `AccountNotFound` when absent.
    pub async fn resolve_account(&self, account_number: &str) -> AppResult<Account> {
        let account_number = require_account_number(account_number)?;

        let account = self
            .store
            .find_account(account_number)
            .await?
            .ok_or_else(|| DomainError::AccountNotFound(account_number.to_string()))?;

        Ok(account)
    }

    /// Current balance of the account.
    pub async fn get_balance(&self, account_number: &str) -> AppResult<Decimal> {
        let account = self.resolve_account(account_number).await?;
        Ok(account.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::handlers::test_support::seed_account;
    use crate::store::MemoryLedgerStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_balance_of_new_account_is_opening_balance() {
        let store: SharedStore = Arc::new(MemoryLedgerStore::new());
        seed_account(&store, "ACC101", dec!(150)).await;

        let resolver = BalanceResolver::new(store);
        assert_eq!(resolver.get_balance("ACC101").await.unwrap(), dec!(150));
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let store: SharedStore = Arc::new(MemoryLedgerStore::new());
        let resolver = BalanceResolver::new(store);

        let err = resolver.get_balance("NON_EXISTENT").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::AccountNotFound(ref n)) if n == "NON_EXISTENT"
        ));
    }

    #[tokio::test]
    async fn test_blank_account_number_is_validation_error() {
        let store: SharedStore = Arc::new(MemoryLedgerStore::new());
        let resolver = BalanceResolver::new(store);

        let err = resolver.get_balance("  ").await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
    }
}
