//! Currencies and minor-unit rounding.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are carried at full `Decimal` precision and only rounded to the
//! currency's minor unit at a presentation or write boundary.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Korean Won
    Krw,
    /// Japanese Yen
    Jpy,
    /// Singapore Dollar
    Sgd,
}

impl Currency {
    /// Number of decimal places in the currency's minor unit.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Usd | Self::Eur | Self::Sgd => 2,
            Self::Krw | Self::Jpy => 0,
        }
    }

    /// Rounds an amount to this currency's minor unit. Halves round away
    /// from zero.
    #[must_use]
    pub fn round(self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.minor_units(), RoundingStrategy::MidpointAwayFromZero)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Krw => write!(f, "KRW"),
            Self::Jpy => write!(f, "JPY"),
            Self::Sgd => write!(f, "SGD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "KRW" => Ok(Self::Krw),
            "JPY" => Ok(Self::Jpy),
            "SGD" => Ok(Self::Sgd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
