//! bank_ledger Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod app;
pub mod domain;
pub mod handlers;
pub mod projection;
pub mod store;

pub mod config;
pub mod db;
mod error;

pub use app::{build_app, AppState};
pub use config::Config;
pub use domain::{Amount, AmountError, DomainError, OperationContext};
pub use error::{AppError, AppResult, ErrorResponse};
