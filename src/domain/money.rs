//! Presentation rounding for currency and percentages.
//!
//! The engine computes in `f64` throughout; values are rounded only when a
//! caller is about to display them.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary amount after presentation rounding.
pub type Money = Decimal;

/// Round a currency amount to 2 decimal places, half away from zero.
///
/// Non-finite input rounds to zero.
pub fn round_currency(value: f64) -> Money {
    round_dp(value, 2)
}

/// Round a percentage to 2 decimal places, half away from zero.
pub fn round_percent(value: f64) -> Decimal {
    round_dp(value, 2)
}

fn round_dp(value: f64, dp: u32) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_to_pennies() {
        assert_eq!(round_currency(51.219_512_195), dec!(51.22));
        assert_eq!(round_currency(48.780_487_8), dec!(48.78));
        assert_eq!(round_currency(-4.545_4), dec!(-4.55));
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        assert_eq!(round_currency(0.125), dec!(0.13));
        assert_eq!(round_currency(-0.125), dec!(-0.13));
    }

    #[test]
    fn non_finite_rounds_to_zero() {
        assert_eq!(round_currency(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn percent_rounding() {
        assert_eq!(round_percent(97.560_975_6), dec!(97.56));
    }
}
