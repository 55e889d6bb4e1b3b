use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code shared by a plan and its money values.
///
/// The fair-contracting business quotes almost everything in `TRY`, but
/// proposals for foreign exhibitors occasionally run in EUR/USD/GBP, so the
/// engine models currency explicitly instead of hardcoding one.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units**
/// (see `Money`). `minor_units()` returns how many fraction digits are used
/// when converting between:
/// - major units (human input/output, e.g. `10.50 TRY`)
/// - minor units (stored integers, e.g. `1050`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Try,
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Try => "TRY",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    /// Symbol appended when formatting amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Try => "₺",
            Currency::Eur => "€",
            Currency::Usd => "$",
            Currency::Gbp => "£",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    ///
    /// All supported currencies use 2 (kuruş/cents/pence).
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Try | Currency::Eur | Currency::Usd | Currency::Gbp => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TRY" => Ok(Currency::Try),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            other => Err(EngineError::InvalidAmount(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes_case_insensitive() {
        assert_eq!(Currency::try_from("try").unwrap(), Currency::Try);
        assert_eq!(Currency::try_from(" EUR ").unwrap(), Currency::Eur);
        assert!(Currency::try_from("JPY").is_err());
    }

    #[test]
    fn default_is_try() {
        assert_eq!(Currency::default(), Currency::Try);
        assert_eq!(Currency::default().code(), "TRY");
    }
}
