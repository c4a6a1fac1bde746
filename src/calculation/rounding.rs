//! Money rounding and overflow-checked arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Rounds an amount to whole Rupiah, half away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("24000.5").unwrap()), Decimal::from(24001));
/// assert_eq!(round_money(Decimal::from_str("-0.5").unwrap()), Decimal::from(-1));
/// assert_eq!(round_money(Decimal::from_str("12.49").unwrap()), Decimal::from(12));
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Turns the result of a checked `Decimal` operation into an error on overflow.
pub(crate) fn checked(value: Option<Decimal>, operation: &str) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::CalculationError {
        message: format!("{} overflowed", operation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round_money(dec("2.5")), dec("3"));
        assert_eq!(round_money(dec("3.5")), dec("4"));
        assert_eq!(round_money(dec("-2.5")), dec("-3"));
    }

    #[test]
    fn test_whole_amounts_are_unchanged() {
        assert_eq!(round_money(dec("358600")), dec("358600"));
        assert_eq!(round_money(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_repeating_division_rounds_to_whole() {
        // 1000 / 12 = 83.333...
        assert_eq!(round_money(dec("1000") / dec("12")), dec("83"));
        // 1010 / 12 = 84.1666...
        assert_eq!(round_money(dec("1010") / dec("12")), dec("84"));
    }

    #[test]
    fn test_checked_overflow_is_calculation_error() {
        match checked(Decimal::MAX.checked_mul(dec("12")), "gross_yearly") {
            Err(EngineError::CalculationError { message }) => {
                assert_eq!(message, "gross_yearly overflowed")
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
        assert_eq!(checked(Some(dec("1")), "x").unwrap(), dec("1"));
    }
}
