//! Basic tax plus stepped marginal tax.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Basic tax from the schedule |
//! | 2    | If income is above the minimum threshold: whole thousands of income × additional rate, else 0 |
//! | 3    | Gross tax (Step 1 + Step 2) |
//! | 4    | Discount (see [`crate::calculations::discount`]) |
//! | 5    | Net tax (Step 3 - Step 4, minimum 0) |
//!
//! The marginal charge is stepped, not continuous: ₱25,999 of income is
//! charged for 25 thousands, the same as ₱25,000.

use rust_decimal::Decimal;

use crate::calculations::common::whole_thousands;
use crate::calculations::discount::apply_discount;
use crate::calculations::engine::ComputationError;
use crate::models::{ComputationMethod, ComputationResult, FeeSchedule, TaxpayerDeclaration};

#[derive(Debug, Clone)]
pub(crate) struct BasicMarginalCalculator<'a> {
    schedule: &'a FeeSchedule,
}

impl<'a> BasicMarginalCalculator<'a> {
    pub(crate) fn new(schedule: &'a FeeSchedule) -> Self {
        Self { schedule }
    }

    /// Schedule amounts are whole centavos, so the components and gross tax
    /// are exact; only the discount and net tax are rounded.
    pub(crate) fn calculate(
        &self,
        declaration: &TaxpayerDeclaration,
    ) -> Result<ComputationResult, ComputationError> {
        let income = declaration.gross_annual_income;
        let out_of_range = || ComputationError::AmountOutOfRange(income);

        let basic_component = self.schedule.basic_tax;
        let marginal_component = self.marginal_component(income).ok_or_else(out_of_range)?;
        let gross_tax = basic_component
            .checked_add(marginal_component)
            .ok_or_else(out_of_range)?;
        let (discount_applied, net_tax) =
            apply_discount(self.schedule, declaration, gross_tax).ok_or_else(out_of_range)?;

        Ok(ComputationResult {
            method: ComputationMethod::BasicPlusMarginal,
            basic_component,
            marginal_or_bracket_component: marginal_component,
            gross_tax,
            discount_applied,
            net_tax,
            bracket_index: None,
        })
    }

    /// Stepped additional tax; zero at or below the minimum income threshold.
    /// `None` on overflow.
    fn marginal_component(
        &self,
        income: Decimal,
    ) -> Option<Decimal> {
        if income <= self.schedule.minimum_income_threshold {
            return Some(Decimal::ZERO);
        }
        whole_thousands(income).checked_mul(self.schedule.additional_rate_per_thousand)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_schedule() -> FeeSchedule {
        FeeSchedule::new(dec!(5), dec!(1), dec!(5000))
    }

    // =========================================================================
    // marginal_component tests
    // =========================================================================

    #[test]
    fn marginal_component_is_zero_at_threshold() {
        let schedule = test_schedule();
        let calculator = BasicMarginalCalculator::new(&schedule);

        assert_eq!(calculator.marginal_component(dec!(5000)), Some(dec!(0)));
    }

    #[test]
    fn marginal_component_steps_per_thousand_above_threshold() {
        let schedule = test_schedule();
        let calculator = BasicMarginalCalculator::new(&schedule);

        assert_eq!(calculator.marginal_component(dec!(5001)), Some(dec!(5)));
        assert_eq!(calculator.marginal_component(dec!(25999.99)), Some(dec!(25)));
    }

    #[test]
    fn marginal_component_applies_fractional_rate() {
        let schedule = FeeSchedule::new(dec!(5), dec!(0.75), dec!(0));
        let calculator = BasicMarginalCalculator::new(&schedule);

        // 12 * 0.75 = 9
        assert_eq!(calculator.marginal_component(dec!(12500)), Some(dec!(9.00)));
    }

    #[test]
    fn marginal_component_is_none_on_overflow() {
        let schedule = FeeSchedule::new(dec!(5), dec!(1000000000), dec!(0));
        let calculator = BasicMarginalCalculator::new(&schedule);

        assert_eq!(calculator.marginal_component(Decimal::MAX), None);
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_adds_basic_and_marginal() {
        let schedule = test_schedule();
        let calculator = BasicMarginalCalculator::new(&schedule);

        let result = calculator
            .calculate(&TaxpayerDeclaration::new(dec!(25000)))
            .expect("in range");

        assert_eq!(result.basic_component, dec!(5));
        assert_eq!(result.marginal_or_bracket_component, dec!(25));
        assert_eq!(result.gross_tax, dec!(30));
        assert_eq!(result.net_tax, dec!(30));
        assert_eq!(result.bracket_index, None);
    }

    #[test]
    fn calculate_with_zero_income_is_basic_tax() {
        let schedule = test_schedule();
        let calculator = BasicMarginalCalculator::new(&schedule);

        let result = calculator
            .calculate(&TaxpayerDeclaration::new(dec!(0)))
            .expect("in range");

        assert_eq!(result.gross_tax, dec!(5));
    }

    #[test]
    fn calculate_keeps_gross_tax_equal_to_basic_tax_below_threshold() {
        let schedule = FeeSchedule::new(dec!(5.05), dec!(1), dec!(5000));
        let calculator = BasicMarginalCalculator::new(&schedule);

        let result = calculator
            .calculate(&TaxpayerDeclaration::new(dec!(100)))
            .expect("in range");

        assert_eq!(result.basic_component, schedule.basic_tax);
        assert_eq!(result.gross_tax, schedule.basic_tax);
    }

    #[test]
    fn calculate_reports_overflow_as_out_of_range() {
        let schedule = FeeSchedule::new(dec!(5), dec!(1000000000), dec!(0));
        let calculator = BasicMarginalCalculator::new(&schedule);

        let result = calculator.calculate(&TaxpayerDeclaration::new(Decimal::MAX));

        assert_eq!(result, Err(ComputationError::AmountOutOfRange(Decimal::MAX)));
    }
}
