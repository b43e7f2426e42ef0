//! Minor-unit rounding for finalized amounts
//!
//! Tax math runs at full precision. Rounding happens once, when an output
//! amount is finalized, using the rule the jurisdiction mandates.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::VatError;

/// Rounding rule applied when an amount is finalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingRule {
    /// Round half to even (bankers rounding)
    #[default]
    HalfEven,
    /// Round half away from zero
    HalfUp,
    /// Round half towards zero
    HalfDown,
    /// Away from zero
    Up,
    /// Towards zero (truncate)
    Down,
    /// Towards positive infinity
    Ceiling,
    /// Towards negative infinity
    Floor,
}

impl RoundingRule {
    fn mode(&self) -> RoundingMode {
        match self {
            RoundingRule::HalfEven => RoundingMode::HalfEven,
            RoundingRule::HalfUp => RoundingMode::HalfUp,
            RoundingRule::HalfDown => RoundingMode::HalfDown,
            RoundingRule::Up => RoundingMode::Up,
            RoundingRule::Down => RoundingMode::Down,
            RoundingRule::Ceiling => RoundingMode::Ceiling,
            RoundingRule::Floor => RoundingMode::Floor,
        }
    }

    /// Config spelling of the rule
    pub fn code(&self) -> &'static str {
        match self {
            RoundingRule::HalfEven => "half-even",
            RoundingRule::HalfUp => "half-up",
            RoundingRule::HalfDown => "half-down",
            RoundingRule::Up => "up",
            RoundingRule::Down => "down",
            RoundingRule::Ceiling => "ceiling",
            RoundingRule::Floor => "floor",
        }
    }
}

impl fmt::Display for RoundingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for RoundingRule {
    type Err = VatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "half-even" | "bankers" => Ok(RoundingRule::HalfEven),
            "half-up" => Ok(RoundingRule::HalfUp),
            "half-down" => Ok(RoundingRule::HalfDown),
            "up" => Ok(RoundingRule::Up),
            "down" => Ok(RoundingRule::Down),
            "ceiling" => Ok(RoundingRule::Ceiling),
            "floor" => Ok(RoundingRule::Floor),
            other => Err(VatError::Config(format!(
                "Unknown rounding rule: '{}'",
                other
            ))),
        }
    }
}

/// Where and how finalized amounts are rounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Number of decimal places kept (2 for centavos/cents)
    pub scale: i64,
    pub rule: RoundingRule,
}

impl RoundingPolicy {
    /// Create a rounding policy
    pub fn new(scale: i64, rule: RoundingRule) -> Self {
        Self { scale, rule }
    }

    /// Round an amount to the policy's scale
    pub fn round(&self, amount: &BigDecimal) -> BigDecimal {
        amount.with_scale_round(self.scale, self.rule.mode())
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::new(2, RoundingRule::HalfEven)
    }
}
