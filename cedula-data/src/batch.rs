//! Computing a batch of declarations against one schedule.
//!
//! A declaration the engine rejects (e.g. a negative income) is recorded on
//! its own row and the batch continues. Schedule-level failures abort the
//! whole batch since every row would fail the same way.

use std::io::Write;

use cedula_core::calculations::compute;
use cedula_core::{ComputationError, ComputationMethod, ComputationResult, FeeSchedule};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{error, info};

use crate::declarations::DeclarationRow;

/// The result of one row of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub row: DeclarationRow,
    pub result: Result<ComputationResult, ComputationError>,
}

/// Computes every row with `method`.
///
/// # Errors
///
/// Returns the first schedule-level [`ComputationError`]
/// (`ScheduleInactive` or `Schedule`) before any row is computed.
pub fn compute_batch(
    method: ComputationMethod,
    schedule: &FeeSchedule,
    rows: Vec<DeclarationRow>,
) -> Result<Vec<BatchOutcome>, ComputationError> {
    if !schedule.active {
        return Err(ComputationError::ScheduleInactive);
    }
    schedule.validate_for(method)?;

    let outcomes: Vec<BatchOutcome> = rows
        .into_iter()
        .map(|row| {
            let result = compute(method, schedule, &row.declaration);
            if let Err(err) = &result {
                if err.is_defect() {
                    error!(row = row.row, error = %err, "bracket lookup failed for validated schedule");
                }
            }
            BatchOutcome { row, result }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        method = %method,
        rows = outcomes.len(),
        failed,
        "batch computed"
    );
    Ok(outcomes)
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    row: usize,
    reference: Option<&'a str>,
    income: Decimal,
    gross_tax: Option<Decimal>,
    discount_category: Option<&'static str>,
    discount_amount: Option<Decimal>,
    net_tax: Option<Decimal>,
    error: Option<String>,
}

impl<'a> From<&'a BatchOutcome> for ResultRow<'a> {
    fn from(outcome: &'a BatchOutcome) -> Self {
        let mut row = ResultRow {
            row: outcome.row.row,
            reference: outcome.row.reference.as_deref(),
            income: outcome.row.declaration.gross_annual_income,
            gross_tax: None,
            discount_category: None,
            discount_amount: None,
            net_tax: None,
            error: None,
        };
        match &outcome.result {
            Ok(result) => {
                row.gross_tax = Some(result.gross_tax);
                row.discount_category = result.discount_applied.category.map(|c| c.as_str());
                row.discount_amount = Some(result.discount_applied.amount);
                row.net_tax = Some(result.net_tax);
            }
            Err(err) => row.error = Some(err.to_string()),
        }
        row
    }
}

/// Writes outcomes as CSV with the header
/// `row,reference,income,gross_tax,discount_category,discount_amount,net_tax,error`.
pub fn write_results<W: Write>(
    writer: W,
    outcomes: &[BatchOutcome],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for outcome in outcomes {
        csv_writer.serialize(ResultRow::from(outcome))?;
    }
    csv_writer.flush()?;
    Ok(())
}
