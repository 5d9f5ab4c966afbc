// 🔢 Amounts - decimal input converted to whole cents at the boundary
//
// Everything past this module works on integer cents. Rounding is
// round-half-away-from-zero at two decimal places.

use crate::error::{DenominationError, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(u64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn new(cents: u64) -> Self {
        Cents(cents)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Convert a euro amount to cents
    pub fn from_decimal(amount: Decimal) -> Result<Self> {
        if amount.is_zero() {
            return Ok(Cents::ZERO);
        }
        if amount.is_sign_negative() {
            return Err(DenominationError::invalid_amount(format!(
                "amount must not be negative, got {}",
                amount
            )));
        }

        let cents = amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_u64())
            .ok_or_else(|| {
                DenominationError::invalid_amount(format!("amount {} is out of range", amount))
            })?;

        Ok(Cents(cents))
    }

    /// Convert a floating point euro amount to cents, rejecting NaN and infinities
    pub fn from_f64(amount: f64) -> Result<Self> {
        if !amount.is_finite() {
            return Err(DenominationError::invalid_amount(format!(
                "amount must be finite, got {}",
                amount
            )));
        }
        if amount < 0.0 {
            return Err(DenominationError::invalid_amount(format!(
                "amount must not be negative, got {}",
                amount
            )));
        }

        let decimal = Decimal::from_f64(amount).ok_or_else(|| {
            DenominationError::invalid_amount(format!("amount {} is out of range", amount))
        })?;
        Cents::from_decimal(decimal)
    }

    /// Euro value as an exact decimal
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::ONE_HUNDRED
    }

    /// Euro value as f64, for JSON payloads
    pub fn to_f64(&self) -> f64 {
        self.to_decimal().to_f64().unwrap_or(f64::NAN)
    }
}

impl FromStr for Cents {
    type Err = DenominationError;

    /// Parse user input such as "234.23" or "45". Surrounding whitespace and
    /// a leading euro sign are tolerated; locale formats are not.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('€').trim();
        if trimmed.is_empty() {
            return Err(DenominationError::invalid_amount("amount is empty"));
        }

        let decimal = Decimal::from_str(trimmed).map_err(|e| {
            DenominationError::invalid_amount(format!("'{}' is not a decimal amount: {}", s, e))
        })?;
        Cents::from_decimal(decimal)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl From<u64> for Cents {
    fn from(cents: u64) -> Self {
        Cents(cents)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_decimal() {
        assert_eq!(Cents::from_decimal(dec!(234.23)).unwrap(), Cents(23_423));
        assert_eq!(Cents::from_decimal(dec!(0)).unwrap(), Cents::ZERO);
        assert_eq!(Cents::from_decimal(dec!(100)).unwrap(), Cents(10_000));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(Cents::from_decimal(dec!(1.005)).unwrap(), Cents(101));
        assert_eq!(Cents::from_decimal(dec!(1.0049)).unwrap(), Cents(100));
        assert_eq!(Cents::from_decimal(dec!(0.015)).unwrap(), Cents(2));
    }

    #[test]
    fn test_rejects_negative() {
        let err = Cents::from_decimal(dec!(-1)).unwrap_err();
        assert!(err.is_invalid_amount());
        assert!(Cents::from_f64(-0.01).unwrap_err().is_invalid_amount());
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(Cents::from_f64(-0.0).unwrap(), Cents::ZERO);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Cents::from_f64(f64::NAN).unwrap_err().is_invalid_amount());
        assert!(Cents::from_f64(f64::INFINITY).unwrap_err().is_invalid_amount());
        assert!(Cents::from_f64(f64::NEG_INFINITY).unwrap_err().is_invalid_amount());
    }

    #[test]
    fn test_from_f64_avoids_float_drift() {
        // 0.1 + 0.2 is 0.30000000000000004 in binary floating point
        assert_eq!(Cents::from_f64(0.1 + 0.2).unwrap(), Cents(30));
        assert_eq!(Cents::from_f64(234.23).unwrap(), Cents(23_423));
        assert_eq!(Cents::from_f64(45.32).unwrap(), Cents(4_532));
    }

    #[test]
    fn test_parse() {
        assert_eq!("234.23".parse::<Cents>().unwrap(), Cents(23_423));
        assert_eq!(" €45.32 ".parse::<Cents>().unwrap(), Cents(4_532));
        assert!("".parse::<Cents>().unwrap_err().is_invalid_amount());
        assert!("12,50".parse::<Cents>().unwrap_err().is_invalid_amount());
        assert!("-3".parse::<Cents>().unwrap_err().is_invalid_amount());
        assert!("NaN".parse::<Cents>().unwrap_err().is_invalid_amount());
    }

    #[test]
    fn test_display_and_conversions() {
        assert_eq!(Cents(23_423).to_string(), "234.23");
        assert_eq!(Cents(5).to_string(), "0.05");
        assert_eq!(Cents(4_532).to_decimal(), dec!(45.32));
        assert_eq!(Cents(10_000).to_f64(), 100.0);
    }
}
