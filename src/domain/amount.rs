//! Monetary primitives
//!
//! Validated money values for the ledger. Every amount that enters the system
//! is checked at construction time, so a movement with a zero, negative or
//! over-precise amount cannot exist.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monetary precision of every stored value (`NUMERIC(18,2)`).
pub const MONEY_SCALE: u32 = 2;

/// Largest value a `NUMERIC(18,2)` column holds.
const MAX_AMOUNT: &str = "9999999999999999.99";

/// Highest accepted annual interest rate, in percent.
pub const MAX_INTEREST_RATE: u32 = 1000;

/// Largest money value the ledger stores.
pub fn max_amount() -> Decimal {
    // 9999999999999999.99
    Decimal::from_i128_with_scale(999_999_999_999_999_999, MONEY_SCALE)
}

/// Whether `value` fits a `NUMERIC(18,2)` money column.
pub fn fits_money_column(value: Decimal) -> bool {
    value.abs() <= max_amount()
}

/// Round to monetary precision and pin the scale so both stores render the
/// same text (`250` becomes `250.00`).
pub fn to_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Amount of a single ledger movement.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - At most 2 decimal places
/// - Fits a `NUMERIC(18,2)` column
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use bank_ledger::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(5000, 2)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(50, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount or an opening balance
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Amount must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Amount has too many decimal places (max {MONEY_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),

    #[error("Rate exceeds maximum allowed value ({MAX_INTEREST_RATE}%)")]
    RateTooHigh,
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if the value does not fit the money column
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        check_precision(value)?;

        Ok(Self(to_money(value)))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check whether `balance` covers this amount.
    pub fn is_covered_by(&self, balance: Decimal) -> bool {
        balance >= self.0
    }
}

/// Validate a value that may be zero, such as an opening balance or an
/// income. Returns it at monetary scale.
pub fn non_negative_money(value: Decimal) -> Result<Decimal, AmountError> {
    if value < Decimal::ZERO {
        return Err(AmountError::Negative(value));
    }
    check_precision(value)?;
    Ok(to_money(value))
}

fn check_precision(value: Decimal) -> Result<(), AmountError> {
    // Trailing zeros (`50.000`) are not extra precision.
    let normalized = value.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(AmountError::TooManyDecimals(normalized.scale()));
    }
    if !fits_money_column(value) {
        return Err(AmountError::Overflow);
    }
    Ok(())
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|e| AmountError::ParseError(e.to_string()))?;
        Amount::new(decimal)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Annual interest rate expressed as a percentage (`5` means 5%).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestRate(Decimal);

impl InterestRate {
    /// Rates must be strictly positive and at most `MAX_INTEREST_RATE`.
    pub fn new(percent: Decimal) -> Result<Self, AmountError> {
        if percent <= Decimal::ZERO {
            return Err(AmountError::NotPositive(percent));
        }
        if percent > Decimal::from(MAX_INTEREST_RATE) {
            return Err(AmountError::RateTooHigh);
        }
        Ok(Self(percent))
    }

    /// Simple interest on `balance`, rounded to monetary precision.
    ///
    /// `None` when the product does not fit a `Decimal`.
    pub fn interest_on(&self, balance: Decimal) -> Option<Decimal> {
        let interest = balance
            .checked_mul(self.0)?
            .checked_div(Decimal::ONE_HUNDRED)?;
        Some(to_money(interest))
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
