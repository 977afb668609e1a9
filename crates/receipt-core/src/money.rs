//! # Money Module
//!
//! Provides the `Money` type and the single entry point where raw user input
//! becomes an exact integer amount.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    "199.99" ──normalize──► 19999 cents                                  │
//! │    Totals are integer sums; nothing downstream sees a float            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Normalization Flow
//! ```text
//! RawAmount ("19.995" | 50000 | Decimal)
//!      │
//!      ▼
//! parse as exact decimal ──── not numeric? ──► AmountError::InvalidAmount
//!      │
//!      ▼
//! round to 2 places, half-up
//!      │
//!      ▼
//! below zero? ──────────────────────────────► AmountError::NegativeAmount
//!      │
//!      ▼
//! × 100 → i64 minor units (Money)
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::AmountError;

/// Number of minor units in one major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor currency units (cents, kobo, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use receipt_core::money::Money;
    ///
    /// let fee = Money::from_cents(19999);
    /// assert_eq!(fee.cents(), 19999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_UNITS_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % MINOR_UNITS_PER_MAJOR).abs()
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

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Formats the amount with a currency symbol and thousands separators.
    ///
    /// ## Example
    /// ```rust
    /// use receipt_core::money::Money;
    ///
    /// let total = Money::from_cents(5019999);
    /// assert_eq!(total.format_with_symbol("$"), "$50,199.99");
    /// ```
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_thousands(self.major().unsigned_abs()),
            self.minor()
        )
    }
}

/// Inserts `,` between every group of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Shows the amount without a symbol, e.g. `50,199.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Raw Amount
// =============================================================================

/// An amount as it arrives from outside: text, a whole number or a decimal.
///
/// JSON integers land in `Integer`. Fractional numbers and plain decimal
/// strings land in `Decimal`. Anything else stays `Text` and is parsed
/// (or rejected) during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Integer(i64),
    Decimal(Decimal),
    Text(String),
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        RawAmount::Text(value)
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Integer(value)
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        RawAmount::Decimal(value)
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Integer(v) => write!(f, "{}", v),
            RawAmount::Decimal(v) => write!(f, "{}", v),
            RawAmount::Text(v) => f.write_str(v),
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Converts a raw amount into exact minor units.
///
/// ## Rules
/// - Text must parse as a decimal number (plain or scientific notation)
/// - Rounded to 2 places with round-half-up (`19.995` → `20.00`)
/// - Negative results are rejected
///
/// ## Example
/// ```rust
/// use receipt_core::money::{normalize_amount, RawAmount};
/// use receipt_core::AmountError;
///
/// assert_eq!(normalize_amount(&RawAmount::from("199.99")).unwrap().cents(), 19999);
/// assert_eq!(normalize_amount(&RawAmount::from(50000)).unwrap().cents(), 5000000);
/// assert!(matches!(
///     normalize_amount(&RawAmount::from("-1")),
///     Err(AmountError::NegativeAmount { .. })
/// ));
/// ```
pub fn normalize_amount(raw: &RawAmount) -> Result<Money, AmountError> {
    let value = match raw {
        RawAmount::Integer(v) => Decimal::from(*v),
        RawAmount::Decimal(v) => *v,
        RawAmount::Text(text) => parse_decimal(text)?,
    };

    // Half-up and away-from-zero agree for every value that survives the sign check
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if rounded < Decimal::ZERO {
        return Err(AmountError::NegativeAmount {
            value: raw.to_string(),
        });
    }

    rounded
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.trunc().to_i64())
        .map(Money::from_cents)
        .ok_or_else(|| AmountError::InvalidAmount {
            value: raw.to_string(),
        })
}

fn parse_decimal(text: &str) -> Result<Decimal, AmountError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| AmountError::InvalidAmount {
            value: text.to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
