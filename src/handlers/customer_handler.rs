//! Customer Handler
//!
//! Registers customers and looks them up.

use chrono::Utc;

use crate::domain::{non_negative_money, Client, DomainError, NewClient, OperationContext};
use crate::error::{AppError, AppResult};
use crate::store::{SharedStore, StoreError};

use super::CreateCustomerCommand;

const MAX_NAME_LEN: usize = 100;
const MAX_GENDER_LEN: usize = 10;

/// Handler for customer registration and lookup
pub struct CustomerHandler {
    store: SharedStore,
}

impl CustomerHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Execute the create customer command
    pub async fn create(
        &self,
        command: CreateCustomerCommand,
        context: &OperationContext,
    ) -> AppResult<Client> {
        let new_client = validate(command)?;
        let name = new_client.name.clone();

        let client = self
            .store
            .insert_client(new_client)
            .await
            .map_err(|e| -> AppError {
                match e {
                    StoreError::UniqueViolation(_) => DomainError::DuplicateClient(name.clone()).into(),
                    other => other.into(),
                }
            })?;

        tracing::info!(
            client_id = client.id,
            correlation_id = ?context.correlation_id,
            "Customer registered"
        );

        Ok(client)
    }

    /// Load a customer by id
    pub async fn get(&self, client_id: i64) -> AppResult<Client> {
        let client = self
            .store
            .find_client(client_id)
            .await?
            .ok_or(DomainError::ClientNotFound(client_id))?;

        Ok(client)
    }
}

fn validate(command: CreateCustomerCommand) -> Result<NewClient, DomainError> {
    let name = command.name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }

    let gender = command.gender.trim();
    if gender.is_empty() {
        return Err(DomainError::validation("Gender is required"));
    }
    if gender.chars().count() > MAX_GENDER_LEN {
        return Err(DomainError::validation(format!(
            "Gender must be at most {} characters",
            MAX_GENDER_LEN
        )));
    }

    if command.date_of_birth > Utc::now().date_naive() {
        return Err(DomainError::validation("Date of birth cannot be in the future"));
    }

    let income = non_negative_money(command.income)
        .map_err(|e| DomainError::validation(format!("Income: {}", e)))?;

    Ok(NewClient {
        name: name.to_string(),
        date_of_birth: command.date_of_birth,
        gender: gender.to_string(),
        income,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedgerStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn command(name: &str, gender: &str, income: rust_decimal::Decimal) -> CreateCustomerCommand {
        CreateCustomerCommand::new(
            name.to_string(),
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender.to_string(),
            income,
        )
    }

    fn handler() -> CustomerHandler {
        CustomerHandler::new(Arc::new(MemoryLedgerStore::new()))
    }

    #[tokio::test]
    async fn test_create_and_get_customer() {
        let handler = handler();
        let ctx = OperationContext::new();

        let client = handler
            .create(command("John Doe", "Male", dec!(50000)), &ctx)
            .await
            .unwrap();
        assert_eq!(client.name, "John Doe");
        assert_eq!(client.income, dec!(50000));

        let loaded = handler.get(client.id).await.unwrap();
        assert_eq!(loaded, client);
    }

    #[tokio::test]
    async fn test_get_unknown_customer() {
        let err = handler().get(99999).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::ClientNotFound(99999))));
    }

    #[tokio::test]
    async fn test_duplicate_customer_is_conflict() {
        let handler = handler();
        let ctx = OperationContext::new();
        handler.create(command("Ana", "Female", dec!(1)), &ctx).await.unwrap();

        let err = handler
            .create(command("Ana", "Female", dec!(2)), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::DuplicateClient(_))));
    }

    #[test]
    fn test_validation_rules() {
        assert!(validate(command("", "Male", dec!(1))).is_err());
        assert!(validate(command("Ana", "", dec!(1))).is_err());
        assert!(validate(command("Ana", "Nonbinary-x", dec!(1))).is_err());
        assert!(validate(command("Ana", "Female", dec!(-5))).is_err());
        assert!(validate(command(&"x".repeat(101), "Male", dec!(1))).is_err());

        let mut future = command("Ana", "Female", dec!(1));
        future.date_of_birth = Utc::now().date_naive() + chrono::Duration::days(1);
        assert!(validate(future).is_err());

        let ok = validate(command("  Ana  ", "Female", dec!(0))).unwrap();
        assert_eq!(ok.name, "Ana");
        assert_eq!(ok.income.to_string(), "0.00");
    }
}
