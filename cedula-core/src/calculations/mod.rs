//! Community tax calculation modules.
//!
//! This module provides the schedule validator, the two computation methods
//! and the discount rules they share.

pub mod common;
pub mod discount;
pub mod engine;
mod methods;
pub mod validation;

pub use engine::{ComputationError, compute, compute_basic_plus_marginal, compute_by_bracket};
pub use validation::{BracketDefect, ScheduleError};
