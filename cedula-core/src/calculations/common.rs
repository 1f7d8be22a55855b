//! Common utility functions for community tax calculations.
//!
//! This module provides the rounding and stepping helpers shared by both
//! computation methods.

use rust_decimal::{Decimal, RoundingStrategy};

/// Income unit the additional tax is charged per.
pub const PER_THOUSAND: Decimal = Decimal::ONE_THOUSAND;

/// Rounds a decimal value to centavos (two decimal places) using half-up
/// rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cedula_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cedula_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Number of whole thousands in `income`, truncated toward zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cedula_core::calculations::common::whole_thousands;
///
/// assert_eq!(whole_thousands(dec!(25000)), dec!(25));
/// assert_eq!(whole_thousands(dec!(25999.99)), dec!(25));
/// assert_eq!(whole_thousands(dec!(999)), dec!(0));
/// ```
pub fn whole_thousands(income: Decimal) -> Decimal {
    (income / PER_THOUSAND).trunc()
}

/// Truncates `value` down to a multiple of `step`.
///
/// `step` must be positive; schedule validation guarantees this for
/// `FeeSchedule::bracket_step`. Returns `None` if `value / step` does not fit
/// in a [`Decimal`].
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use cedula_core::calculations::common::floor_to_step;
///
/// assert_eq!(floor_to_step(dec!(5000.50), dec!(1)), Some(dec!(5000)));
/// assert_eq!(floor_to_step(dec!(5000.567), dec!(0.01)), Some(dec!(5000.56)));
/// ```
pub fn floor_to_step(
    value: Decimal,
    step: Decimal,
) -> Option<Decimal> {
    value.checked_div(step)?.floor().checked_mul(step)
}
