use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits PayPal accepts on the NVP wire.
pub const WIRE_SCALE: u32 = 2;

/// A monetary value as it travels on the NVP wire: exactly two decimals.
///
/// This is a wrapper around `rust_decimal::Decimal` that rounds on
/// construction (midpoint away from zero) so every amount written into a
/// request has already been through the same rounding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        let rounded =
            value.round_dp_with_strategy(WIRE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        // -0.00 must never reach the wire
        if rounded.is_zero() {
            Self::ZERO
        } else {
            Self(rounded)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Fixed-point, `.` separator, no grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Formats any decimal the way the wire expects it.
pub fn format_amount(value: Decimal) -> String {
    Money::new(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec!(1.005)).value(), dec!(1.01));
        assert_eq!(Money::new(dec!(-1.005)).value(), dec!(-1.01));
        assert_eq!(Money::new(dec!(2.004)).value(), dec!(2.00));
    }

    #[test]
    fn test_display_always_two_decimals() {
        assert_eq!(Money::new(dec!(32.5)).to_string(), "32.50");
        assert_eq!(Money::new(dec!(7)).to_string(), "7.00");
        assert_eq!(Money::new(dec!(1234567.891)).to_string(), "1234567.89");
    }

    #[test]
    fn test_zero_is_never_negative() {
        assert_eq!(Money::new(dec!(-0.001)).to_string(), "0.00");
        assert!(Money::new(dec!(-0.004)).is_zero());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(3.25) * dec!(10.000)), "32.50");
    }
}
