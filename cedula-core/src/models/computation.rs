use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DiscountCategory;

/// Which of the two community tax algorithms a computation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationMethod {
    /// Basic tax plus a stepped charge per ₱1,000 of income.
    BasicPlusMarginal,
    /// Flat fee looked up from the bracket table.
    BracketTable,
}

impl ComputationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicPlusMarginal => "basic_plus_marginal",
            Self::BracketTable => "bracket_table",
        }
    }
}

impl fmt::Display for ComputationMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The discount that was applied to a computation, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    /// `None` when no category applied.
    pub category: Option<DiscountCategory>,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl AppliedDiscount {
    pub fn none() -> Self {
        Self {
            category: None,
            rate: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }
}

/// Breakdown of a community tax computation, suitable for display on an
/// issued certificate or for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationResult {
    pub method: ComputationMethod,

    /// Basic tax. Zero for the bracket-table method.
    pub basic_component: Decimal,

    /// Stepped marginal tax, or the flat bracket fee.
    pub marginal_or_bracket_component: Decimal,

    /// `basic_component + marginal_or_bracket_component`.
    pub gross_tax: Decimal,

    pub discount_applied: AppliedDiscount,

    /// Amount due after the discount, never negative.
    pub net_tax: Decimal,

    /// Position of the matched bracket in the table sorted by `min`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket_index: Option<usize>,
}

impl fmt::Display for ComputationResult {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Method:             {}", self.method)?;
        writeln!(f, "Basic tax:          {}", self.basic_component)?;
        match self.bracket_index {
            Some(index) => writeln!(
                f,
                "Bracket fee:        {} (bracket #{})",
                self.marginal_or_bracket_component,
                index + 1
            )?,
            None => writeln!(
                f,
                "Additional tax:     {}",
                self.marginal_or_bracket_component
            )?,
        }
        writeln!(f, "Gross tax:          {}", self.gross_tax)?;
        match self.discount_applied.category {
            Some(category) => writeln!(
                f,
                "Discount:           -{} ({}, {}%)",
                self.discount_applied.amount,
                category,
                (self.discount_applied.rate * Decimal::ONE_HUNDRED).normalize()
            )?,
            None => writeln!(f, "Discount:           none")?,
        }
        write!(f, "Amount due:         {}", self.net_tax)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn display_basic_plus_marginal_with_discount() {
        let result = ComputationResult {
            method: ComputationMethod::BasicPlusMarginal,
            basic_component: dec!(5.00),
            marginal_or_bracket_component: dec!(25.00),
            gross_tax: dec!(30.00),
            discount_applied: AppliedDiscount {
                category: Some(DiscountCategory::SeniorCitizen),
                rate: dec!(0.20),
                amount: dec!(6.00),
            },
            net_tax: dec!(24.00),
            bracket_index: None,
        };

        assert_eq!(
            result.to_string(),
            "Method:             basic_plus_marginal\n\
             Basic tax:          5.00\n\
             Additional tax:     25.00\n\
             Gross tax:          30.00\n\
             Discount:           -6.00 (Senior Citizen, 20%)\n\
             Amount due:         24.00"
        );
    }

    #[test]
    fn display_bracket_table_without_discount() {
        let result = ComputationResult {
            method: ComputationMethod::BracketTable,
            basic_component: dec!(0),
            marginal_or_bracket_component: dec!(20),
            gross_tax: dec!(20),
            discount_applied: AppliedDiscount::none(),
            net_tax: dec!(20),
            bracket_index: Some(2),
        };

        assert_eq!(
            result.to_string(),
            "Method:             bracket_table\n\
             Basic tax:          0\n\
             Bracket fee:        20 (bracket #3)\n\
             Gross tax:          20\n\
             Discount:           none\n\
             Amount due:         20"
        );
    }
}
