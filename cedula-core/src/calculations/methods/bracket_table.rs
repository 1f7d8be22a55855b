//! Flat-fee bracket table lookup.
//!
//! Each bracket carries a single fee, not a marginal formula. Income is
//! truncated to the schedule's `bracket_step` before the lookup, so a
//! whole-peso table places ₱5,000.50 in the bracket ending at ₱5,000.

use rust_decimal::Decimal;

use crate::calculations::common::floor_to_step;
use crate::calculations::discount::apply_discount;
use crate::calculations::engine::ComputationError;
use crate::models::{
    ComputationMethod, ComputationResult, FeeSchedule, TaxBracket, TaxpayerDeclaration,
};

#[derive(Debug, Clone)]
pub(crate) struct BracketTableCalculator<'a> {
    schedule: &'a FeeSchedule,
    brackets: Vec<TaxBracket>,
}

impl<'a> BracketTableCalculator<'a> {
    pub(crate) fn new(schedule: &'a FeeSchedule) -> Self {
        Self {
            schedule,
            brackets: schedule.sorted_brackets(),
        }
    }

    pub(crate) fn calculate(
        &self,
        declaration: &TaxpayerDeclaration,
    ) -> Result<ComputationResult, ComputationError> {
        let income = declaration.gross_annual_income;
        let lookup = floor_to_step(income, self.schedule.bracket_step)
            .ok_or(ComputationError::AmountOutOfRange(income))?;
        let (index, bracket) = self
            .find_bracket(lookup)
            .ok_or(ComputationError::NoMatchingBracket(income))?;
        let bracket_component = bracket.rate;
        let gross_tax = bracket_component;
        let (discount_applied, net_tax) = apply_discount(self.schedule, declaration, gross_tax)
            .ok_or(ComputationError::AmountOutOfRange(income))?;

        Ok(ComputationResult {
            method: ComputationMethod::BracketTable,
            basic_component: Decimal::ZERO,
            marginal_or_bracket_component: bracket_component,
            gross_tax,
            discount_applied,
            net_tax,
            bracket_index: Some(index),
        })
    }

    /// `lookup` is the income already truncated to the bracket step.
    fn find_bracket(
        &self,
        lookup: Decimal,
    ) -> Option<(usize, &TaxBracket)> {
        self.brackets
            .iter()
            .enumerate()
            .find(|(_, bracket)| bracket.contains(lookup))
    }
}
