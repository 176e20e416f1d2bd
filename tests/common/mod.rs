//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use bank_ledger::store::{MemoryLedgerStore, SharedStore};
use bank_ledger::{build_app, AppState};

/// App backed by a fresh in-memory store
pub fn memory_app() -> Router {
    let store: SharedStore = Arc::new(MemoryLedgerStore::new());
    build_app(AppState::new(store))
}

/// Send a request and decode the JSON body (`Value::Null` when empty or not JSON)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Register a customer and return its id
pub async fn create_customer(app: &Router, name: &str) -> i64 {
    let (status, json) = send(
        app,
        "POST",
        "/api/customers",
        Some(serde_json::json!({
            "name": name,
            "dateOfBirth": "1990-01-01",
            "gender": "Male",
            "income": 50000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "customer creation failed: {}", json);
    json["id"].as_i64().unwrap()
}

/// Open an account with the given opening balance
pub async fn create_account(app: &Router, client_id: i64, number: &str, balance: &str) {
    let (status, json) = send(
        app,
        "POST",
        "/api/accounts",
        Some(serde_json::json!({
            "accountNumber": number,
            "clientId": client_id,
            "balance": balance
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "account creation failed: {}", json);
}

/// Connect to the test database and empty the ledger tables
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query("TRUNCATE TABLE transactions, accounts, clients RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}
