//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Integer Cents In Memory, Decimals On The Wire
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE MONEY LIVES                                                      │
//! │                                                                         │
//! │  JSON payloads / operations column:   25.5      (major units)          │
//! │                 │                                                       │
//! │                 ▼  Deserialize (round half away from zero)             │
//! │  In memory:                           Money(2550)  (cents, i64)        │
//! │                 │                                                       │
//! │                 ▼  Serialize                                            │
//! │  JSON payloads / operations column:   25.5                             │
//! │                                                                         │
//! │  SQLite columns store the cents directly (INTEGER).                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Session totals are sums of many operation profits. Summing integer cents
//! never drifts, so `totalProfit` is always exactly the sum of its inputs.
//!
//! ## Usage
//! ```rust
//! use cashdesk_core::money::Money;
//!
//! let profit = Money::from_cents(2550); // 25.50
//! let total = profit + Money::from_cents(1450);
//! assert_eq!(total.cents(), 4000);
//! assert_eq!(total.to_string(), "40.00");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for losses and corrections
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde as decimal**: Payloads carry `25.5`, not `2550`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use cashdesk_core::money::Money;
    ///
    /// let amount = Money::from_cents(1099); // 10.99
    /// assert_eq!(amount.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount in major units.
    ///
    /// Only used at the serialization boundary. Rounds the amount as written
    /// (its shortest decimal form) half away from zero to the nearest cent.
    /// Returns `None` for NaN, infinities and amounts whose cents do not fit
    /// in an `i64`.
    ///
    /// ## Example
    /// ```rust
    /// use cashdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(25.5).unwrap().cents(), 2550);
    /// assert_eq!(Money::from_major(1.005).unwrap().cents(), 101);
    /// assert!(Money::from_major(f64::NAN).is_none());
    /// assert!(Money::from_major(1e17).is_none());
    /// ```
    pub fn from_major(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        // f64 Display never uses exponent notation.
        Money::parse_decimal(&amount.to_string())
    }

    /// Parses plain decimal text (`"-12.345"`) into cents, rounding the
    /// third fractional digit half away from zero.
    fn parse_decimal(text: &str) -> Option<Self> {
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut fraction = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = fraction.next().unwrap_or(0);
        let hundredths = fraction.next().unwrap_or(0);
        let round_up = fraction.next().is_some_and(|digit| digit >= 5);

        let cents = whole
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;

        Some(Money(if negative { -cents } else { cents }))
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal in major units (for the wire only).
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering. Currency symbols are a display concern of the app.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_major(amount)
            .ok_or_else(|| serde::de::Error::custom("money amount must be a finite number within range"))
    }
}

// =============================================================================
// Money Input
// =============================================================================

/// A money amount as it arrives from an outside payload.
///
/// Edit requests may carry totals as numbers or as numeric text (`"12.5"`).
/// Both are coerced to [`Money`] before anything is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyInput {
    Amount(Money),
    Text(String),
}

impl MoneyInput {
    /// Coerces the input to `Money`, naming `field` in the error.
    ///
    /// ## Example
    /// ```rust
    /// use cashdesk_core::money::{Money, MoneyInput};
    ///
    /// let text = MoneyInput::Text(" 12.5 ".to_string());
    /// assert_eq!(text.to_money("totalIncome").unwrap(), Money::from_cents(1250));
    /// ```
    pub fn to_money(&self, field: &str) -> Result<Money, ValidationError> {
        match self {
            MoneyInput::Amount(money) => Ok(*money),
            MoneyInput::Text(text) => {
                let text = text.trim();
                if let Some(money) = Money::parse_decimal(text) {
                    return Ok(money);
                }

                let parsed = text.parse::<f64>().map_err(|e| ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: e.to_string(),
                })?;
                Money::from_major(parsed).ok_or_else(|| ValidationError::OutOfRange {
                    field: field.to_string(),
                })
            }
        }
    }
}

impl Default for MoneyInput {
    fn default() -> Self {
        MoneyInput::Amount(Money::zero())
    }
}

impl From<Money> for MoneyInput {
    fn from(money: Money) -> Self {
        MoneyInput::Amount(money)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(1);
        assert_eq!(c.cents(), 1499);
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_cents(250);
        assert_eq!(a.checked_add(Money::from_cents(-50)), Some(Money::from_cents(200)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_from_major_rounding() {
        assert_eq!(Money::from_major(10.0).unwrap().cents(), 1000);
        assert_eq!(Money::from_major(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_major(0.125).unwrap().cents(), 13);
        // 1.005 * 100.0 is 100.49999999999999 in binary floating point
        assert_eq!(Money::from_major(1.005).unwrap().cents(), 101);
        assert_eq!(Money::from_major(-2.005).unwrap().cents(), -201);
        assert_eq!(Money::from_major(-2.004).unwrap().cents(), -200);
        assert_eq!(Money::from_major(0.004).unwrap().cents(), 0);
        assert!(Money::from_major(f64::INFINITY).is_none());
    }

    #[test]
    fn test_from_major_rejects_out_of_range() {
        assert!(Money::from_major(1e17).is_none());
        assert!(Money::from_major(-1e17).is_none());
        assert!(Money::from_major(f64::MAX).is_none());
        assert_eq!(
            Money::from_major(90_000_000_000_000_000.0 / 1000.0).unwrap().cents(),
            9_000_000_000_000_000
        );

        assert!(serde_json::from_str::<Money>("1e17").is_err());
    }

    #[test]
    fn test_serde_as_decimal() {
        let json = serde_json::to_string(&Money::from_cents(2550)).unwrap();
        assert_eq!(json, "25.5");

        let money: Money = serde_json::from_str("40").unwrap();
        assert_eq!(money.cents(), 4000);

        let money: Money = serde_json::from_str("0.07").unwrap();
        assert_eq!(money.cents(), 7);
    }

    #[test]
    fn test_money_input_coercion() {
        let input: MoneyInput = serde_json::from_str("\"100\"").unwrap();
        assert_eq!(input.to_money("initial").unwrap().cents(), 10000);

        let input: MoneyInput = serde_json::from_str("3.25").unwrap();
        assert_eq!(input.to_money("initial").unwrap().cents(), 325);

        let input = MoneyInput::Text("2.005".to_string());
        assert_eq!(input.to_money("initial").unwrap().cents(), 201);

        let input = MoneyInput::Text("1e3".to_string());
        assert_eq!(input.to_money("initial").unwrap().cents(), 100000);

        let bad = MoneyInput::Text("ten".to_string());
        let err = bad.to_money("totalProfit").unwrap_err();
        assert!(err.to_string().starts_with("totalProfit has invalid format"));

        let huge = MoneyInput::Text("100000000000000000".to_string());
        assert!(matches!(huge.to_money("totalProfit"), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }
}
