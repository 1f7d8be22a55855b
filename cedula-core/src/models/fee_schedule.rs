use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DiscountEligibility, DiscountRates, TaxBracket};

/// Community tax fee schedule as configured by the barangay administrator.
///
/// The engine treats a schedule as an immutable value: callers that allow
/// live editing hand the engine a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Flat minimum tax due regardless of income.
    pub basic_tax: Decimal,

    /// Amount added for every full ₱1,000 of gross income once income is
    /// above `minimum_income_threshold`.
    pub additional_rate_per_thousand: Decimal,

    /// Income at or below which only `basic_tax` applies.
    pub minimum_income_threshold: Decimal,

    #[serde(default)]
    pub discount_eligibility: DiscountEligibility,

    #[serde(default)]
    pub discount_rates: DiscountRates,

    /// Flat-fee bracket table used by the bracket-table method.
    #[serde(default)]
    pub brackets: Vec<TaxBracket>,

    /// Smallest currency unit the bracket table is declared in. Adjacent
    /// brackets satisfy `next.min == prev.max + bracket_step`.
    #[serde(default = "default_bracket_step")]
    pub bracket_step: Decimal,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_bracket_step() -> Decimal {
    Decimal::ONE
}

fn default_active() -> bool {
    true
}

impl FeeSchedule {
    /// Creates an active schedule with no brackets, every discount switched
    /// off, and the default discount rates.
    pub fn new(
        basic_tax: Decimal,
        additional_rate_per_thousand: Decimal,
        minimum_income_threshold: Decimal,
    ) -> Self {
        Self {
            basic_tax,
            additional_rate_per_thousand,
            minimum_income_threshold,
            discount_eligibility: DiscountEligibility::default(),
            discount_rates: DiscountRates::default(),
            brackets: Vec::new(),
            bracket_step: default_bracket_step(),
            active: true,
        }
    }

    pub fn with_brackets(
        mut self,
        brackets: Vec<TaxBracket>,
    ) -> Self {
        self.brackets = brackets;
        self
    }

    pub fn with_eligibility(
        mut self,
        eligibility: DiscountEligibility,
    ) -> Self {
        self.discount_eligibility = eligibility;
        self
    }

    pub fn with_discount_rates(
        mut self,
        rates: DiscountRates,
    ) -> Self {
        self.discount_rates = rates;
        self
    }

    /// Brackets ordered ascending by `min`, leaving `self` untouched.
    pub fn sorted_brackets(&self) -> Vec<TaxBracket> {
        let mut brackets = self.brackets.clone();
        brackets.sort_by(|a, b| a.min.cmp(&b.min));
        brackets
    }
}
