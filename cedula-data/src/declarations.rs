//! CSV loader for batches of taxpayer declarations.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter.
//!
//! | Column           | Required | Notes                                          |
//! |------------------|----------|------------------------------------------------|
//! | `reference`      | no       | Free text echoed in the results (e.g. a name)  |
//! | `income`         | yes      | Peso amount; `₱`, `PHP` and commas accepted     |
//! | `senior_citizen` | no       | yes/no, true/false, y/n, 1/0; empty = no       |
//! | `pwd`            | no       | as above                                       |
//! | `student`        | no       | as above                                       |
//!
//! ```csv
//! reference,income,senior_citizen,pwd,student
//! Dela Cruz,"₱25,000.00",yes,,
//! Santos,7500,,,y
//! ```

use cedula_core::TaxpayerDeclaration;
use serde::Deserialize;

use crate::amount::{ParseAmountError, ParseFlagError, parse_amount, parse_flag};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    reference: Option<String>,
    income: String,
    #[serde(default)]
    senior_citizen: Option<String>,
    #[serde(default)]
    pwd: Option<String>,
    #[serde(default)]
    student: Option<String>,
}

/// Errors that can occur while loading a declaration batch.
#[derive(Debug, thiserror::Error)]
pub enum DeclarationLoadError {
    /// The underlying CSV deserialisation failed.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// An `income` cell could not be read. `row` is 1-based (header = row 0).
    #[error("invalid income on row {row}: {source}")]
    InvalidIncome {
        row: usize,
        #[source]
        source: ParseAmountError,
    },

    #[error("invalid {column} on row {row}: {source}")]
    InvalidFlag {
        row: usize,
        column: &'static str,
        #[source]
        source: ParseFlagError,
    },
}

/// One declaration from the batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationRow {
    /// 1-based row number, for messages.
    pub row: usize,
    pub reference: Option<String>,
    pub declaration: TaxpayerDeclaration,
}

fn parse_flag_cell(
    value: Option<&str>,
    column: &'static str,
    row: usize,
) -> Result<bool, DeclarationLoadError> {
    parse_flag(value.unwrap_or_default())
        .map_err(|source| DeclarationLoadError::InvalidFlag { row, column, source })
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<DeclarationRow, DeclarationLoadError> {
    let gross_annual_income =
        parse_amount(&row.income).map_err(|source| DeclarationLoadError::InvalidIncome {
            row: row_number,
            source,
        })?;

    Ok(DeclarationRow {
        row: row_number,
        reference: row.reference.filter(|r| !r.is_empty()),
        declaration: TaxpayerDeclaration {
            gross_annual_income,
            is_senior_citizen: parse_flag_cell(
                row.senior_citizen.as_deref(),
                "senior_citizen",
                row_number,
            )?,
            is_pwd: parse_flag_cell(row.pwd.as_deref(), "pwd", row_number)?,
            is_student: parse_flag_cell(row.student.as_deref(), "student", row_number)?,
        },
    })
}

/// Parse CSV text and return the declarations in file order.
///
/// Negative incomes are passed through; the engine rejects them per row.
pub fn load_from_str(input: &str) -> Result<Vec<DeclarationRow>, DeclarationLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}
