//! Community tax computation entry points.
//!
//! Every computation is a pure function of a [`FeeSchedule`] and a
//! [`TaxpayerDeclaration`]. Before computing, the engine checks, in order:
//!
//! 1. The schedule is active ([`ComputationError::ScheduleInactive`])
//! 2. The schedule is valid for the selected method
//!    ([`ComputationError::Schedule`])
//! 3. The declared income is non-negative
//!    ([`ComputationError::InvalidDeclaration`])
//!
//! Arithmetic is checked; a tax too large for a [`Decimal`] is reported as
//! [`ComputationError::AmountOutOfRange`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use cedula_core::calculations::compute_basic_plus_marginal;
//! use cedula_core::{DiscountCategory, DiscountEligibility, FeeSchedule, TaxpayerDeclaration};
//!
//! let schedule = FeeSchedule::new(dec!(5), dec!(1), dec!(5000))
//!     .with_eligibility(DiscountEligibility::all());
//!
//! let declaration = TaxpayerDeclaration {
//!     is_senior_citizen: true,
//!     ..TaxpayerDeclaration::new(dec!(25000))
//! };
//!
//! let result = compute_basic_plus_marginal(&schedule, &declaration).unwrap();
//!
//! assert_eq!(result.gross_tax, dec!(30));
//! assert_eq!(result.discount_applied.category, Some(DiscountCategory::SeniorCitizen));
//! assert_eq!(result.net_tax, dec!(24));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::methods::{BasicMarginalCalculator, BracketTableCalculator};
use crate::calculations::validation::ScheduleError;
use crate::models::{ComputationMethod, ComputationResult, FeeSchedule, TaxpayerDeclaration};

/// Errors returned by the computation entry points.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComputationError {
    /// The schedule is switched off and accepts no computations.
    #[error("fee schedule is inactive")]
    ScheduleInactive,

    /// The schedule failed validation.
    #[error("invalid fee schedule: {0}")]
    Schedule(#[from] ScheduleError),

    /// The declaration cannot be computed, e.g. a negative income.
    #[error("invalid declaration: gross annual income must be non-negative, got {0}")]
    InvalidDeclaration(Decimal),

    /// No bracket covers the declared income.
    ///
    /// Validation guarantees coverage from zero, so for an open-ended table
    /// this indicates a defect rather than bad user input.
    #[error("no tax bracket found for income {0}")]
    NoMatchingBracket(Decimal),

    /// The tax for this income does not fit in a [`Decimal`].
    #[error("tax for income {0} is too large to compute")]
    AmountOutOfRange(Decimal),
}

impl ComputationError {
    /// `true` for errors that signal a broken invariant rather than bad
    /// input from the taxpayer or the administrator.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::NoMatchingBracket(_))
    }
}

/// Computes the community tax with the basic-plus-marginal method.
///
/// `gross_tax = basic_tax + whole_thousands(income) × additional_rate_per_thousand`,
/// where the second term is zero when income is at or below the minimum
/// income threshold.
///
/// # Errors
///
/// See the module documentation for the precondition checks.
pub fn compute_basic_plus_marginal(
    schedule: &FeeSchedule,
    declaration: &TaxpayerDeclaration,
) -> Result<ComputationResult, ComputationError> {
    ensure_computable(schedule, declaration, ComputationMethod::BasicPlusMarginal)?;

    BasicMarginalCalculator::new(schedule).calculate(declaration)
}

/// Computes the community tax with the bracket-table method.
///
/// `gross_tax` is the flat fee of the bracket covering the declared income.
///
/// # Errors
///
/// On top of the precondition checks, returns
/// [`ScheduleError::EmptyBracketTable`] (wrapped) for a schedule without
/// brackets and [`ComputationError::NoMatchingBracket`] when the income lies
/// above a bounded top bracket.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use cedula_core::calculations::compute_by_bracket;
/// use cedula_core::{FeeSchedule, TaxBracket, TaxpayerDeclaration};
///
/// let schedule = FeeSchedule::new(dec!(5), dec!(1), dec!(5000)).with_brackets(vec![
///     TaxBracket::new(dec!(0), Some(dec!(5000)), dec!(5)),
///     TaxBracket::new(dec!(5001), Some(dec!(10000)), dec!(10)),
///     TaxBracket::new(dec!(10001), Some(dec!(20000)), dec!(20)),
/// ]);
///
/// let result = compute_by_bracket(&schedule, &TaxpayerDeclaration::new(dec!(15000))).unwrap();
///
/// assert_eq!(result.gross_tax, dec!(20));
/// assert_eq!(result.net_tax, dec!(20));
/// ```
pub fn compute_by_bracket(
    schedule: &FeeSchedule,
    declaration: &TaxpayerDeclaration,
) -> Result<ComputationResult, ComputationError> {
    ensure_computable(schedule, declaration, ComputationMethod::BracketTable)?;

    BracketTableCalculator::new(schedule).calculate(declaration)
}

/// Computes the community tax with the caller-selected method.
pub fn compute(
    method: ComputationMethod,
    schedule: &FeeSchedule,
    declaration: &TaxpayerDeclaration,
) -> Result<ComputationResult, ComputationError> {
    match method {
        ComputationMethod::BasicPlusMarginal => compute_basic_plus_marginal(schedule, declaration),
        ComputationMethod::BracketTable => compute_by_bracket(schedule, declaration),
    }
}

fn ensure_computable(
    schedule: &FeeSchedule,
    declaration: &TaxpayerDeclaration,
    method: ComputationMethod,
) -> Result<(), ComputationError> {
    if !schedule.active {
        return Err(ComputationError::ScheduleInactive);
    }
    schedule.validate_for(method)?;
    if declaration.gross_annual_income < Decimal::ZERO {
        return Err(ComputationError::InvalidDeclaration(
            declaration.gross_annual_income,
        ));
    }
    Ok(())
}
