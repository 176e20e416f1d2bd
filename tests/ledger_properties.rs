//! Property-based tests for the ledger.
//!
//! Any sequence of deposits and withdrawals must keep the stored balance
//! equal to the fold of the transaction log and never below zero.

use std::sync::Arc;

use bank_ledger::domain::{to_money, TransactionKind};
use bank_ledger::handlers::{
    ApplyInterestCommand, CreateAccountCommand, CreateAccountHandler, CreateCustomerCommand,
    CustomerHandler, InterestApplicator, RegisterTransactionCommand, TransactionRegistrar,
};
use bank_ledger::projection::{BalanceResolver, HistoryProjector};
use bank_ledger::store::{MemoryLedgerStore, SharedStore};
use bank_ledger::{AppError, DomainError, OperationContext};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Positive amount with cent precision (0.01 to 5000.00).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_kind() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![Just(TransactionKind::Deposit), Just(TransactionKind::Withdrawal)]
}

/// Percentage rate between 0.01 and 25.00.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (1i64..=2_500i64).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

/// Store holding one account `PROP1` with the given opening balance.
async fn seeded_store(opening: Decimal) -> SharedStore {
    let store: SharedStore = Arc::new(MemoryLedgerStore::new());
    let ctx = OperationContext::new();

    let client = CustomerHandler::new(store.clone())
        .create(
            CreateCustomerCommand::new(
                "Property Owner".to_string(),
                NaiveDate::from_ymd_opt(1980, 2, 29).unwrap(),
                "Other".to_string(),
                Decimal::ZERO,
            ),
            &ctx,
        )
        .await
        .unwrap();

    CreateAccountHandler::new(store.clone())
        .execute(
            CreateAccountCommand::new("PROP1".to_string(), client.id, opening),
            &ctx,
        )
        .await
        .unwrap();

    store
}

// =============================================================================
// Ledger Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Balance equals opening balance plus the signed log, and stays >= 0.
    #[test]
    fn balance_matches_log_fold(
        opening in (0i64..=100_000i64).prop_map(|c| Decimal::new(c, 2)),
        ops in prop::collection::vec((arb_kind(), arb_amount()), 0..20),
    ) {
        tokio_test::block_on(async {
            let store = seeded_store(opening).await;
            let registrar = TransactionRegistrar::new(store.clone());
            let ctx = OperationContext::new();
            let mut accepted = 0usize;

            for (kind, amount) in &ops {
                let command = RegisterTransactionCommand::new("PROP1".to_string(), *kind, *amount);
                match registrar.execute(command, &ctx).await {
                    Ok(_) => accepted += 1,
                    Err(AppError::Domain(DomainError::InsufficientFunds { .. })) => {
                        prop_assert_eq!(*kind, TransactionKind::Withdrawal);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
            }

            let balance = BalanceResolver::new(store.clone()).get_balance("PROP1").await.unwrap();
            let history = HistoryProjector::new(store).get_history("PROP1").await.unwrap();

            prop_assert!(balance >= Decimal::ZERO);
            prop_assert_eq!(history.len(), accepted);

            let mut running = opening;
            for tx in &history {
                running += tx.kind.signed(tx.amount);
                prop_assert_eq!(tx.balance_after_transaction, running);
                prop_assert!(tx.balance_after_transaction >= Decimal::ZERO);
            }
            prop_assert_eq!(running, balance);
            Ok(())
        })?;
    }

    /// Interest credits the rounded amount and leaves the log untouched.
    #[test]
    fn interest_adds_rounded_amount(
        opening in (0i64..=10_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        rate in arb_rate(),
    ) {
        tokio_test::block_on(async {
            let store = seeded_store(opening).await;

            let account = InterestApplicator::new(store.clone())
                .execute(
                    ApplyInterestCommand::new("PROP1".to_string(), rate),
                    &OperationContext::new(),
                )
                .await
                .unwrap();

            let expected = opening + to_money(opening * rate / Decimal::ONE_HUNDRED);
            prop_assert_eq!(account.balance, expected);
            prop_assert!(account.balance >= opening);
            prop_assert_eq!(account.balance.scale(), 2);

            let history = HistoryProjector::new(store).get_history("PROP1").await.unwrap();
            prop_assert!(history.is_empty());
            Ok(())
        })?;
    }
}
