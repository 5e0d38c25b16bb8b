//! # Money
//!
//! A lightweight newtype over `f64` for monetary amounts. It serializes as a
//! bare number so data files stay plain JSON:
//!
//! ```rust
//! use split_core::money::Money;
//!
//! let lunch = Money::new(42.5);
//! assert_eq!(serde_json::to_string(&lunch).unwrap(), "42.5");
//! assert_eq!(lunch.to_string(), "42.50");
//! assert_eq!(Money::new(-3.0).format_with("$"), "-$3.00");
//! ```
//!
//! Amounts are kept at full precision between operations; call
//! [`Money::round_cents`] at the points where the ledger settles on a value.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::equal_split::round_to_cents;

/// Below this magnitude two amounts are considered equal.
pub const CENT_EPSILON: f64 = 0.01;

/// A monetary amount in the ledger's single currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub f64);

impl Money {
    pub const ZERO: Money = Money(0.0);

    pub fn new(value: f64) -> Self {
        Money(value)
    }

    /// Raw value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Round to whole cents.
    pub fn round_cents(self) -> Self {
        Money(round_to_cents(self.0))
    }

    /// True when the amount is within one cent of zero.
    pub fn is_negligible(self) -> bool {
        self.0.abs() <= CENT_EPSILON
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    /// Format with a currency symbol, sign first (`-$3.00`).
    pub fn format_with(self, symbol: &str) -> String {
        if self.0 < 0.0 && self.round_cents().0 != 0.0 {
            format!("-{}{:.2}", symbol, -self.0)
        } else {
            format!("{}{:.2}", symbol, self.0.abs())
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<f64> for Money {
    fn from(value: f64) -> Self {
        Money(value)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
