//! Coin amounts
//!
//! Domain primitives for coin amounts and item quantities.
//! Both are validated at construction time, so a zero or negative
//! value can never reach the ledger store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest single movement accepted (one billion coins)
const MAX_COINS: i64 = 1_000_000_000;

/// Largest quantity accepted in a single purchase
const MAX_QUANTITY: i32 = 10_000;

/// Coins represents a validated, strictly positive number of coins.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Value never exceeds one billion coins
///
/// # Example
/// ```
/// use coin_wallet::domain::Coins;
///
/// let coins = Coins::new(100).unwrap();
/// assert_eq!(coins.value(), 100);
/// assert!(Coins::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Coins(i64);

/// Errors that can occur when creating an amount or a quantity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(i64),

    #[error("Amount exceeds maximum allowed value ({MAX_COINS})")]
    Overflow,

    #[error("Quantity must be positive (got {0})")]
    QuantityNotPositive(i64),

    #[error("Quantity exceeds maximum allowed value ({MAX_QUANTITY})")]
    QuantityOverflow,
}

impl Coins {
    /// Create a new amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::Overflow` if value > one billion
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value <= 0 {
            return Err(AmountError::NotPositive(value));
        }
        if value > MAX_COINS {
            return Err(AmountError::Overflow);
        }
        Ok(Self(value))
    }

    /// Get the underlying integer value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Total cost of `quantity` units priced at `self` each.
    pub fn times(&self, quantity: Quantity) -> Result<Coins, AmountError> {
        let total = self
            .0
            .checked_mul(i64::from(quantity.value()))
            .ok_or(AmountError::Overflow)?;
        Coins::new(total)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Coins {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Coins::new(value)
    }
}

impl From<Coins> for i64 {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

/// Quantity of a catalog item in a single purchase, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value <= 0 {
            return Err(AmountError::QuantityNotPositive(value));
        }
        if value > i64::from(MAX_QUANTITY) {
            return Err(AmountError::QuantityOverflow);
        }
        Ok(Self(value as i32))
    }

    pub fn one() -> Self {
        Self(1)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}
