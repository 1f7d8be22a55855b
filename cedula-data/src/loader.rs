//! Loading fee schedules from configuration files.
//!
//! A schedule is described by a TOML settings file and, optionally, a CSV
//! bracket table. Amounts may be written as TOML strings (`"5.00"`) or
//! numbers.
//!
//! ```toml
//! basic_tax = "5.00"
//! additional_rate_per_thousand = "1.00"
//! minimum_income_threshold = "5000"
//! bracket_step = "1"      # optional, defaults to 1
//! active = true           # optional, defaults to true
//!
//! [discounts.eligibility]
//! senior_citizen = true
//! pwd = true
//! student = false
//!
//! [discounts.rates]       # optional, defaults to 0.20 / 0.20 / 0.10
//! student = "0.15"
//!
//! [[brackets]]            # optional; a CSV file replaces these
//! min = "0"
//! max = "5000"
//! rate = "5"
//! ```
//!
//! The bracket CSV has the columns `min,max,rate`; an empty `max` marks the
//! open-ended top bracket.

use std::io::Read;
use std::path::Path;

use cedula_core::{DiscountEligibility, DiscountRates, FeeSchedule, ScheduleError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a fee schedule.
#[derive(Debug, Error)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schedule: {0}")]
    Invalid(#[from] ScheduleError),
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket table CSV file.
///
/// - `min`: lowest income covered by the bracket
/// - `max`: highest income covered (empty for the open-ended top bracket)
/// - `rate`: flat community tax due for incomes in the bracket
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub min: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl From<BracketRecord> for TaxBracket {
    fn from(record: BracketRecord) -> Self {
        TaxBracket::new(record.min, record.max, record.rate)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// A `[[brackets]]` entry in the settings file; omit `max` for the
/// open-ended top bracket.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InlineBracket {
    min: Decimal,
    max: Option<Decimal>,
    rate: Decimal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DiscountsSection {
    eligibility: DiscountEligibility,
    rates: DiscountRates,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScheduleSettings {
    basic_tax: Decimal,
    additional_rate_per_thousand: Decimal,
    minimum_income_threshold: Decimal,
    bracket_step: Option<Decimal>,
    active: Option<bool>,
    #[serde(default)]
    discounts: DiscountsSection,
    #[serde(default)]
    brackets: Vec<InlineBracket>,
}

impl From<ScheduleSettings> for FeeSchedule {
    fn from(settings: ScheduleSettings) -> Self {
        let mut schedule = FeeSchedule::new(
            settings.basic_tax,
            settings.additional_rate_per_thousand,
            settings.minimum_income_threshold,
        )
        .with_eligibility(settings.discounts.eligibility)
        .with_discount_rates(settings.discounts.rates)
        .with_brackets(
            settings
                .brackets
                .into_iter()
                .map(|b| TaxBracket::new(b.min, b.max, b.rate))
                .collect(),
        );
        if let Some(step) = settings.bracket_step {
            schedule.bracket_step = step;
        }
        if let Some(active) = settings.active {
            schedule.active = active;
        }
        schedule
    }
}

/// Loader for fee schedules from TOML settings and CSV bracket tables.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parse schedule settings from TOML text.
    ///
    /// The result is not validated; see [`ScheduleLoader::load_files`].
    pub fn from_toml_str(input: &str) -> Result<FeeSchedule, ScheduleLoaderError> {
        let settings: ScheduleSettings = toml::from_str(input)?;
        Ok(settings.into())
    }

    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<TaxBracket>, ScheduleLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut brackets = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            brackets.push(record.into());
        }

        Ok(brackets)
    }

    /// Assemble a schedule from in-memory settings and an optional bracket
    /// CSV, then validate it.
    ///
    /// Brackets from the CSV replace any `[[brackets]]` in the settings.
    pub fn assemble<R: Read>(
        settings: &str,
        brackets: Option<R>,
    ) -> Result<FeeSchedule, ScheduleLoaderError> {
        let mut schedule = Self::from_toml_str(settings)?;
        if let Some(reader) = brackets {
            schedule.brackets = Self::parse_brackets(reader)?;
        }
        schedule.validate()?;
        Ok(schedule)
    }

    /// Read and validate a schedule from a settings file and an optional
    /// bracket CSV file.
    pub fn load_files(
        settings_path: &Path,
        brackets_path: Option<&Path>,
    ) -> Result<FeeSchedule, ScheduleLoaderError> {
        let settings = read_to_string(settings_path)?;
        let brackets = brackets_path
            .map(|path| {
                std::fs::File::open(path).map_err(|source| ScheduleLoaderError::Io {
                    path: path.display().to_string(),
                    source,
                })
            })
            .transpose()?;

        let schedule = Self::assemble(&settings, brackets)?;
        debug!(
            settings = %settings_path.display(),
            brackets = schedule.brackets.len(),
            active = schedule.active,
            "fee schedule loaded"
        );
        Ok(schedule)
    }
}

fn read_to_string(path: &Path) -> Result<String, ScheduleLoaderError> {
    std::fs::read_to_string(path).map_err(|source| ScheduleLoaderError::Io {
        path: path.display().to_string(),
        source,
    })
}
