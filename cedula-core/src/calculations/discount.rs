//! Discount selection shared by both computation methods.
//!
//! A taxpayer may qualify for several categories at once; at most one
//! discount is applied. The category with the highest rate wins among those
//! the declaration claims and the schedule currently honors. Equal rates are
//! resolved by [`DiscountCategory::PRECEDENCE`]: senior citizen, then PWD,
//! then student.

use rust_decimal::Decimal;

use crate::calculations::common::{max, round_half_up};
use crate::models::{AppliedDiscount, DiscountCategory, FeeSchedule, TaxpayerDeclaration};

/// Picks the discount category and rate to apply, if any.
///
/// Categories with a zero rate are skipped so that a result never reports a
/// category that did not reduce the tax.
pub fn select_discount(
    schedule: &FeeSchedule,
    declaration: &TaxpayerDeclaration,
) -> Option<(DiscountCategory, Decimal)> {
    DiscountCategory::PRECEDENCE
        .into_iter()
        .filter(|&category| {
            declaration.claims(category) && schedule.discount_eligibility.is_enabled(category)
        })
        .map(|category| (category, schedule.discount_rates.rate_for(category)))
        .filter(|(_, rate)| *rate > Decimal::ZERO)
        .fold(None, |best, candidate| match best {
            Some((_, best_rate)) if best_rate >= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Applies the selected discount to `gross_tax`.
///
/// Returns the applied discount and the net tax, rounded half-up to centavos
/// and never negative, or `None` if the arithmetic overflows.
pub fn apply_discount(
    schedule: &FeeSchedule,
    declaration: &TaxpayerDeclaration,
    gross_tax: Decimal,
) -> Option<(AppliedDiscount, Decimal)> {
    let discount = match select_discount(schedule, declaration) {
        Some((category, rate)) => AppliedDiscount {
            category: Some(category),
            rate,
            amount: round_half_up(gross_tax.checked_mul(rate)?),
        },
        None => AppliedDiscount::none(),
    };
    let net_tax = max(
        round_half_up(gross_tax.checked_sub(discount.amount)?),
        Decimal::ZERO,
    );
    Some((discount, net_tax))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{DiscountEligibility, DiscountRates};

    fn test_schedule() -> FeeSchedule {
        FeeSchedule::new(dec!(5), dec!(1), dec!(5000)).with_eligibility(DiscountEligibility::all())
    }

    fn declaration(
        senior: bool,
        pwd: bool,
        student: bool,
    ) -> TaxpayerDeclaration {
        TaxpayerDeclaration {
            gross_annual_income: dec!(25000),
            is_senior_citizen: senior,
            is_pwd: pwd,
            is_student: student,
        }
    }

    // =========================================================================
    // select_discount tests
    // =========================================================================

    #[test]
    fn select_discount_returns_none_without_claims() {
        let result = select_discount(&test_schedule(), &declaration(false, false, false));

        assert_eq!(result, None);
    }

    #[test]
    fn select_discount_picks_single_claim() {
        let result = select_discount(&test_schedule(), &declaration(false, false, true));

        assert_eq!(result, Some((DiscountCategory::Student, dec!(0.10))));
    }

    #[test]
    fn select_discount_prefers_senior_over_pwd_on_equal_rates() {
        let result = select_discount(&test_schedule(), &declaration(true, true, false));

        assert_eq!(result, Some((DiscountCategory::SeniorCitizen, dec!(0.20))));
    }

    #[test]
    fn select_discount_prefers_pwd_over_student_on_equal_rates() {
        let schedule = test_schedule().with_discount_rates(DiscountRates {
            senior_citizen: dec!(0.20),
            pwd: dec!(0.15),
            student: dec!(0.15),
        });

        let result = select_discount(&schedule, &declaration(false, true, true));

        assert_eq!(result, Some((DiscountCategory::Pwd, dec!(0.15))));
    }

    #[test]
    fn select_discount_prefers_highest_rate_over_precedence() {
        let schedule = test_schedule().with_discount_rates(DiscountRates {
            senior_citizen: dec!(0.10),
            pwd: dec!(0.20),
            student: dec!(0.30),
        });

        let result = select_discount(&schedule, &declaration(true, true, true));

        assert_eq!(result, Some((DiscountCategory::Student, dec!(0.30))));
    }

    #[test]
    fn select_discount_ignores_disabled_categories() {
        let schedule = test_schedule().with_eligibility(DiscountEligibility {
            senior_citizen: false,
            pwd: true,
            student: true,
        });

        let result = select_discount(&schedule, &declaration(true, false, true));

        assert_eq!(result, Some((DiscountCategory::Student, dec!(0.10))));
    }

    #[test]
    fn select_discount_skips_zero_rates() {
        let schedule = test_schedule().with_discount_rates(DiscountRates {
            senior_citizen: dec!(0),
            ..DiscountRates::default()
        });

        let result = select_discount(&schedule, &declaration(true, false, false));

        assert_eq!(result, None);
    }

    // =========================================================================
    // apply_discount tests
    // =========================================================================

    #[test]
    fn apply_discount_reduces_gross_tax() {
        let (discount, net_tax) =
            apply_discount(&test_schedule(), &declaration(true, false, false), dec!(30))
                .expect("in range");

        assert_eq!(discount.category, Some(DiscountCategory::SeniorCitizen));
        assert_eq!(discount.amount, dec!(6.00));
        assert_eq!(net_tax, dec!(24.00));
    }

    #[test]
    fn apply_discount_rounds_half_up_to_centavos() {
        // 10.25 * 0.10 = 1.025 -> 1.03
        let (discount, net_tax) =
            apply_discount(&test_schedule(), &declaration(false, false, true), dec!(10.25))
                .expect("in range");

        assert_eq!(discount.amount, dec!(1.03));
        assert_eq!(net_tax, dec!(9.22));
    }

    #[test]
    fn apply_discount_full_rate_yields_zero() {
        let schedule = test_schedule().with_discount_rates(DiscountRates {
            pwd: dec!(1),
            ..DiscountRates::default()
        });

        let (_, net_tax) = apply_discount(&schedule, &declaration(false, true, false), dec!(17.35))
            .expect("in range");

        assert_eq!(net_tax, dec!(0.00));
    }

    #[test]
    fn apply_discount_without_category_keeps_gross() {
        let (discount, net_tax) =
            apply_discount(&test_schedule(), &declaration(false, false, false), dec!(30))
                .expect("in range");

        assert_eq!(discount, AppliedDiscount::none());
        assert_eq!(net_tax, dec!(30));
    }

    #[test]
    fn apply_discount_handles_largest_gross_tax() {
        let (discount, net_tax) =
            apply_discount(&test_schedule(), &declaration(true, false, false), Decimal::MAX)
                .expect("a rate of at most one cannot overflow");

        assert!(discount.amount > Decimal::ZERO);
        assert!(net_tax < Decimal::MAX);
    }
}
