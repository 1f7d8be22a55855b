//! The two community tax algorithms.
//!
//! Both calculators assume the engine has already checked the schedule and
//! declaration; see [`crate::calculations::engine`].

mod basic_marginal;
mod bracket_table;

pub(crate) use basic_marginal::BasicMarginalCalculator;
pub(crate) use bracket_table::BracketTableCalculator;
