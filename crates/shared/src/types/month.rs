//! Calendar months and fixed 12-month amount arrays.
//!
//! Monthly plan and actual figures are always carried as a 12-element array
//! indexed by a validated [`Month`], never as maps keyed by month strings.

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A calendar month in the range 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    /// January.
    pub const JANUARY: Self = Self(1);
    /// December.
    pub const DECEMBER: Self = Self(12);

    /// Creates a month from its 1-based number.
    ///
    /// Returns `None` outside 1..=12.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number <= 12 {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Returns the 1-based month number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Returns the 0-based array index.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Iterates January through December.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=12).map(Self)
    }
}

impl TryFrom<u8> for Month {
    type Error = InvalidMonth;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidMonth(value))
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error for a month number outside 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Month must be between 1 and 12, got {0}")]
pub struct InvalidMonth(pub u8);

/// Twelve monthly amounts, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlyAmounts(pub [Decimal; 12]);

impl MonthlyAmounts {
    /// All months zero.
    pub const ZERO: Self = Self([Decimal::ZERO; 12]);

    /// The same amount in every month.
    #[must_use]
    pub const fn uniform(amount: Decimal) -> Self {
        Self([amount; 12])
    }

    /// Sum over the twelve months.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.iter().copied().sum()
    }

    /// Returns true if every month is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Decimal::is_zero)
    }

    /// Iterates `(month, amount)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Month, Decimal)> + '_ {
        Month::all().zip(self.0.iter().copied())
    }

    /// Applies `f` to every month.
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(Decimal) -> Decimal) -> Self {
        let mut out = *self;
        for value in &mut out.0 {
            *value = f(*value);
        }
        out
    }
}

impl Index<Month> for MonthlyAmounts {
    type Output = Decimal;

    fn index(&self, month: Month) -> &Self::Output {
        &self.0[month.index()]
    }
}

impl IndexMut<Month> for MonthlyAmounts {
    fn index_mut(&mut self, month: Month) -> &mut Self::Output {
        &mut self.0[month.index()]
    }
}

impl AddAssign<&MonthlyAmounts> for MonthlyAmounts {
    fn add_assign(&mut self, rhs: &MonthlyAmounts) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0.iter()) {
            *lhs += *rhs;
        }
    }
}

impl Add for MonthlyAmounts {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += &rhs;
        self
    }
}
