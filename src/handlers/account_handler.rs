//! Account Handler
//!
//! Opens accounts for existing customers.

use chrono::Utc;

use crate::domain::{
    non_negative_money, require_account_number, Account, DomainError, NewAccount,
    OperationContext,
};
use crate::error::{AppError, AppResult};
use crate::store::{constraints, SharedStore, StoreError};

use super::CreateAccountCommand;

const MAX_ACCOUNT_NUMBER_LEN: usize = 50;

/// Handler for account creation
pub struct CreateAccountHandler {
    store: SharedStore,
}

impl CreateAccountHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Execute the create account command
    pub async fn execute(
        &self,
        command: CreateAccountCommand,
        context: &OperationContext,
    ) -> AppResult<Account> {
        let account_number = require_account_number(&command.account_number)?.to_string();
        if account_number.chars().count() > MAX_ACCOUNT_NUMBER_LEN {
            return Err(DomainError::validation(format!(
                "Account number must be at most {} characters",
                MAX_ACCOUNT_NUMBER_LEN
            ))
            .into());
        }

        let opening_balance = non_negative_money(command.balance)
            .map_err(|e| DomainError::validation(format!("Balance: {}", e)))?;

        if self.store.find_client(command.client_id).await?.is_none() {
            return Err(DomainError::ClientNotFound(command.client_id).into());
        }

        let new_account = NewAccount {
            account_number: account_number.clone(),
            opening_balance,
            created_at: command.created_at.unwrap_or_else(Utc::now),
            client_id: command.client_id,
        };

        let account = self
            .store
            .insert_account(new_account)
            .await
            .map_err(|e| -> AppError {
                match e {
                    StoreError::UniqueViolation(_) => {
                        DomainError::DuplicateAccountNumber(account_number.clone()).into()
                    }
                    // Client deleted between the check and the insert
                    StoreError::ForeignKeyViolation(ref c) if c == constraints::ACCOUNT_CLIENT => {
                        DomainError::ClientNotFound(command.client_id).into()
                    }
                    other => other.into(),
                }
            })?;

        tracing::info!(
            account_id = account.id,
            account_number = %account.account_number,
            client_id = account.client_id,
            correlation_id = ?context.correlation_id,
            "Account opened"
        );

        Ok(account)
    }
}
