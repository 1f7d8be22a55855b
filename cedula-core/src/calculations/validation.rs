//! Fee schedule validation.
//!
//! A [`FeeSchedule`] must be internally consistent before either computation
//! method uses it. Checks run in a fixed order so a schedule with several
//! defects always reports the same one:
//!
//! 1. Scalar amounts (`basic_tax`, `additional_rate_per_thousand`,
//!    `minimum_income_threshold`, `bracket_step`, discount rates)
//!
//! Peso amounts that end up in the tax due (`basic_tax`,
//! `additional_rate_per_thousand` and bracket fees) must be whole centavos,
//! so gross tax is exact without rounding.
//! 2. Each bracket on its own, in declaration order
//! 3. Coverage of the bracket table once sorted by `min`
//!
//! # Bracket adjacency
//!
//! Adjacency is strict. Sorted by `min`, the first bracket starts at zero and
//! every following bracket starts exactly one `bracket_step` above the
//! previous bracket's `max`. With the default whole-peso step the table
//! `[0, 5000]`, `[5001, 10000]`, `[10001, ∞)` is valid, while
//! `[0, 5000]`, `[5000, 10000]` (overlap) and `[0, 5000]`, `[5002, 10000]`
//! (gap) are both rejected with [`ScheduleError::BracketGap`].

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{ComputationMethod, DiscountCategory, FeeSchedule};

/// What is wrong with a single bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketDefect {
    NegativeMinimum,
    MaximumBelowMinimum,
    NegativeRate,
    FractionalCentavoRate,
    /// An open-ended bracket that is not the highest one.
    UnboundedNotLast,
}

impl fmt::Display for BracketDefect {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::NegativeMinimum => "minimum income is negative",
            Self::MaximumBelowMinimum => "maximum income is below minimum income",
            Self::NegativeRate => "rate is negative",
            Self::FractionalCentavoRate => "rate is not a whole number of centavos",
            Self::UnboundedNotLast => "only the highest bracket may be open-ended",
        })
    }
}

/// Errors reported by [`FeeSchedule::validate`] and
/// [`FeeSchedule::validate_for`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// A scalar amount or rate is outside its allowed range.
    #[error("{field} must be non-negative, got {value}")]
    InvalidAmount { field: &'static str, value: Decimal },

    /// A peso amount has a fraction of a centavo.
    #[error("{field} must be a whole number of centavos, got {value}")]
    FractionalCentavo { field: &'static str, value: Decimal },

    /// A bracket bound is too large for the next bracket to start above it.
    #[error("{field} {value} is too large to compute with")]
    AmountOutOfRange { field: &'static str, value: Decimal },

    /// A discount rate is outside `[0, 1]`.
    #[error("discount rate for {category} must be between 0 and 1, got {value}")]
    InvalidDiscountRate {
        category: DiscountCategory,
        value: Decimal,
    },

    /// `bracket_step` must be positive.
    #[error("bracket step must be positive, got {0}")]
    InvalidBracketStep(Decimal),

    /// A bracket is malformed on its own. `index` is its position as declared.
    #[error("bracket {index} is invalid: {defect}")]
    InvalidBracket { index: usize, defect: BracketDefect },

    /// Sorted brackets do not cover incomes from zero without gaps or
    /// overlaps. `previous_max` is `None` when the lowest bracket does not
    /// start at zero.
    #[error("bracket table is not contiguous: expected {expected_min} after {}, found {next_min}", fmt_previous(.previous_max))]
    BracketGap {
        previous_max: Option<Decimal>,
        expected_min: Decimal,
        next_min: Decimal,
    },

    /// The bracket-table method was selected but the schedule has no brackets.
    #[error("bracket table is empty")]
    EmptyBracketTable,
}

fn is_whole_centavos(value: Decimal) -> bool {
    value.round_dp(2) == value
}

fn fmt_previous(previous_max: &Option<Decimal>) -> String {
    previous_max
        .map(|max| max.to_string())
        .unwrap_or_else(|| "the start of the table".to_string())
}

impl FeeSchedule {
    /// Validates the schedule independent of the computation method.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScheduleError`] found; see the module
    /// documentation for the order of checks.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use cedula_core::{FeeSchedule, TaxBracket};
    /// use cedula_core::calculations::ScheduleError;
    ///
    /// let schedule = FeeSchedule::new(dec!(5), dec!(1), dec!(5000)).with_brackets(vec![
    ///     TaxBracket::new(dec!(0), Some(dec!(5000)), dec!(5)),
    ///     TaxBracket::new(dec!(5001), Some(dec!(10000)), dec!(10)),
    ///     TaxBracket::new(dec!(20000), Some(dec!(30000)), dec!(30)),
    /// ]);
    ///
    /// assert!(matches!(
    ///     schedule.validate(),
    ///     Err(ScheduleError::BracketGap { .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.validate_amounts()?;
        self.validate_discount_rates()?;
        self.validate_each_bracket()?;
        self.validate_coverage()
    }

    /// Validates the schedule for use with `method`.
    ///
    /// On top of [`FeeSchedule::validate`], the bracket-table method requires
    /// at least one bracket.
    pub fn validate_for(
        &self,
        method: ComputationMethod,
    ) -> Result<(), ScheduleError> {
        self.validate()?;
        if method == ComputationMethod::BracketTable && self.brackets.is_empty() {
            return Err(ScheduleError::EmptyBracketTable);
        }
        Ok(())
    }

    fn validate_amounts(&self) -> Result<(), ScheduleError> {
        let amounts = [
            ("basic_tax", self.basic_tax),
            (
                "additional_rate_per_thousand",
                self.additional_rate_per_thousand,
            ),
            ("minimum_income_threshold", self.minimum_income_threshold),
        ];
        if let Some((field, value)) = amounts
            .into_iter()
            .find(|(_, value)| *value < Decimal::ZERO)
        {
            return Err(ScheduleError::InvalidAmount { field, value });
        }
        if let Some((field, value)) = amounts
            .into_iter()
            .take(2)
            .find(|(_, value)| !is_whole_centavos(*value))
        {
            return Err(ScheduleError::FractionalCentavo { field, value });
        }
        if self.bracket_step <= Decimal::ZERO {
            return Err(ScheduleError::InvalidBracketStep(self.bracket_step));
        }
        Ok(())
    }

    fn validate_discount_rates(&self) -> Result<(), ScheduleError> {
        for category in DiscountCategory::PRECEDENCE {
            let value = self.discount_rates.rate_for(category);
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ScheduleError::InvalidDiscountRate { category, value });
            }
        }
        Ok(())
    }

    fn validate_each_bracket(&self) -> Result<(), ScheduleError> {
        for (index, bracket) in self.brackets.iter().enumerate() {
            let defect = if bracket.min < Decimal::ZERO {
                Some(BracketDefect::NegativeMinimum)
            } else if bracket.max.is_some_and(|max| max < bracket.min) {
                Some(BracketDefect::MaximumBelowMinimum)
            } else if bracket.rate < Decimal::ZERO {
                Some(BracketDefect::NegativeRate)
            } else if !is_whole_centavos(bracket.rate) {
                Some(BracketDefect::FractionalCentavoRate)
            } else {
                None
            };
            if let Some(defect) = defect {
                return Err(ScheduleError::InvalidBracket { index, defect });
            }
        }
        Ok(())
    }

    fn validate_coverage(&self) -> Result<(), ScheduleError> {
        let mut order: Vec<usize> = (0..self.brackets.len()).collect();
        order.sort_by(|&a, &b| self.brackets[a].min.cmp(&self.brackets[b].min));

        let mut previous_max: Option<Decimal> = None;
        let mut expected_min = Decimal::ZERO;
        for (position, &index) in order.iter().enumerate() {
            let bracket = &self.brackets[index];
            if bracket.min != expected_min {
                return Err(ScheduleError::BracketGap {
                    previous_max,
                    expected_min,
                    next_min: bracket.min,
                });
            }
            match bracket.max {
                Some(max) => {
                    previous_max = Some(max);
                    match max.checked_add(self.bracket_step) {
                        Some(next) => expected_min = next,
                        None if position + 1 < order.len() => {
                            return Err(ScheduleError::AmountOutOfRange {
                                field: "bracket maximum",
                                value: max,
                            });
                        }
                        None => {}
                    }
                }
                None if position + 1 < order.len() => {
                    return Err(ScheduleError::InvalidBracket {
                        index,
                        defect: BracketDefect::UnboundedNotLast,
                    });
                }
                None => {}
            }
        }
        Ok(())
    }
}
