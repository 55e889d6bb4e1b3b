use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Installment share of the plan total, in whole percent.
///
/// The editor only ever offers multiples of 5 between 5 and 100, so the type
/// enforces exactly that set; anything else coming from the wire or from user
/// input is rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Step between two adjacent valid values.
    pub const STEP: u8 = 5;

    /// Validates and wraps a raw percent value.
    pub fn try_new(value: u8) -> Result<Self, EngineError> {
        if value < 5 || value > 100 || value % Self::STEP != 0 {
            return Err(EngineError::InvalidPercentage(format!(
                "{value}% is not a multiple of 5 in 5..=100"
            )));
        }
        Ok(Self(value))
    }

    /// Returns the raw percent value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Next step up, saturating at 100%.
    #[must_use]
    pub const fn step_up(self) -> Self {
        if self.0 >= 100 {
            self
        } else {
            Self(self.0 + Self::STEP)
        }
    }

    /// Next step down, saturating at 5%.
    #[must_use]
    pub const fn step_down(self) -> Self {
        if self.0 <= Self::STEP {
            self
        } else {
            Self(self.0 - Self::STEP)
        }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percentage {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(value: Percentage) -> Self {
        value.0
    }
}
