//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, FromRequest, FromRequestParts, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::domain::{Account, Client, DomainError, OperationContext, Transaction, TransactionKind};
use crate::error::AppError;
use crate::handlers::{
    ApplyInterestCommand, CreateAccountCommand, CreateAccountHandler, CreateCustomerCommand,
    CustomerHandler, InterestApplicator, RegisterTransactionCommand, TransactionRegistrar,
};
use crate::projection::{AccountSummary, BalanceResolver, HistoryProjector, TransactionSummary};

// =========================================================================
// Extractors
// =========================================================================

/// `Json` whose rejections become 400 `AppError`s
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub income: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub income: Decimal,
}

impl From<Client> for CustomerResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            date_of_birth: client.date_of_birth,
            gender: client.gender,
            income: client.income,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateAccountRequest {
    pub account_number: String,
    pub client_id: i64,
    pub balance: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub account_number: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub client_id: i64,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            account_number: account.account_number,
            balance: account.balance,
            created_at: account.created_at,
            client_id: account.client_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub account_number: String,
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApplyInterestQuery {
    pub annual_rate: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterTransactionRequest {
    pub account_number: String,
    pub transaction_type: TransactionKind,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    pub transaction_type: TransactionKind,
    pub amount: Decimal,
    pub balance_after_transaction: Decimal,
    pub transaction_date: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            transaction_type: tx.kind,
            amount: tx.amount,
            balance_after_transaction: tx.balance_after_transaction,
            transaction_date: tx.transaction_date,
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Customers
        .route("/customers", post(create_customer))
        .route("/customers/:id", get(get_customer))
        // Accounts
        .route("/accounts", post(create_account))
        .route("/accounts/balance/", get(get_balance_without_number))
        .route("/accounts/balance/:account_number", get(get_balance))
        .route("/accounts/apply-interest/:account_number", post(apply_interest))
        // Transactions
        .route("/transactions/register", post(register_transaction))
        .route("/transactions/history/:account_number", get(get_history))
        .route("/transactions/Summary/:account_number", get(get_summary))
}

/// Log a failed operation with its account and correlation id.
fn log_failure<'a>(
    operation: &'static str,
    account_number: &'a str,
    context: &'a OperationContext,
) -> impl FnOnce(AppError) -> AppError + 'a {
    move |err| {
        if err.is_internal() {
            tracing::error!(
                operation,
                account_number,
                correlation_id = ?context.correlation_id,
                error = ?err,
                "Operation failed"
            );
        } else {
            tracing::warn!(
                operation,
                account_number,
                correlation_id = ?context.correlation_id,
                status = %err.status_code(),
                error = %err,
                "Operation rejected"
            );
        }
        err
    }
}

// =========================================================================
// POST /customers
// =========================================================================

async fn create_customer(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    AppJson(request): AppJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let handler = CustomerHandler::new(state.store);

    let command = CreateCustomerCommand::new(
        request.name,
        request.date_of_birth,
        request.gender,
        request.income,
    );
    let client = handler.create(command, &context).await?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

// =========================================================================
// GET /customers/:id
// =========================================================================

async fn get_customer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CustomerResponse>, AppError> {
    let client = CustomerHandler::new(state.store).get(id).await?;
    Ok(Json(client.into()))
}

// =========================================================================
// POST /accounts
// =========================================================================

async fn create_account(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let handler = CreateAccountHandler::new(state.store);

    let command =
        CreateAccountCommand::new(request.account_number, request.client_id, request.balance);
    let command = if let Some(created_at) = request.created_at {
        command.with_created_at(created_at)
    } else {
        command
    };

    let account = handler.execute(command, &context).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

// =========================================================================
// GET /accounts/balance/:account_number
// =========================================================================

async fn get_balance(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    AppPath(account_number): AppPath<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = BalanceResolver::new(state.store)
        .get_balance(&account_number)
        .await
        .map_err(log_failure("get_balance", &account_number, &context))?;

    Ok(Json(BalanceResponse {
        account_number: account_number.trim().to_string(),
        balance,
    }))
}

async fn get_balance_without_number() -> Result<Json<BalanceResponse>, AppError> {
    Err(DomainError::validation("Account number is required").into())
}

// =========================================================================
// POST /accounts/apply-interest/:account_number
// =========================================================================

async fn apply_interest(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    AppPath(account_number): AppPath<String>,
    AppQuery(query): AppQuery<ApplyInterestQuery>,
) -> Result<Json<AccountResponse>, AppError> {
    let applicator = InterestApplicator::new(state.store);

    let account = applicator
        .execute(
            ApplyInterestCommand::new(account_number.clone(), query.annual_rate),
            &context,
        )
        .await
        .map_err(log_failure("apply_interest", &account_number, &context))?;

    Ok(Json(account.into()))
}

// =========================================================================
// POST /transactions/register
// =========================================================================

async fn register_transaction(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    AppJson(request): AppJson<RegisterTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let registrar = TransactionRegistrar::new(state.store);
    let account_number = request.account_number.clone();

    let command = RegisterTransactionCommand::new(
        request.account_number,
        request.transaction_type,
        request.amount,
    );

    let transaction = registrar
        .execute(command, &context)
        .await
        .map_err(log_failure("register_transaction", &account_number, &context))?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}

// =========================================================================
// GET /transactions/history/:account_number
// =========================================================================

async fn get_history(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    AppPath(account_number): AppPath<String>,
) -> Result<Json<Vec<TransactionSummary>>, AppError> {
    let history = HistoryProjector::new(state.store)
        .get_history(&account_number)
        .await
        .map_err(log_failure("get_history", &account_number, &context))?;

    Ok(Json(history.iter().map(TransactionSummary::from).collect()))
}

// =========================================================================
// GET /transactions/Summary/:account_number
// =========================================================================

async fn get_summary(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    AppPath(account_number): AppPath<String>,
) -> Result<Json<AccountSummary>, AppError> {
    let summary = HistoryProjector::new(state.store)
        .get_summary(&account_number)
        .await
        .map_err(log_failure("get_summary", &account_number, &context))?;

    Ok(Json(summary))
}
