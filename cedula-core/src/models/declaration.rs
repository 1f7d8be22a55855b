use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DiscountCategory;

/// What a taxpayer declares when requesting a community tax certificate.
///
/// The category flags are not mutually exclusive; the engine applies at most
/// one discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerDeclaration {
    pub gross_annual_income: Decimal,
    #[serde(default)]
    pub is_senior_citizen: bool,
    #[serde(default)]
    pub is_pwd: bool,
    #[serde(default)]
    pub is_student: bool,
}

impl TaxpayerDeclaration {
    /// A declaration with the given income and no discount category.
    pub fn new(gross_annual_income: Decimal) -> Self {
        Self {
            gross_annual_income,
            is_senior_citizen: false,
            is_pwd: false,
            is_student: false,
        }
    }

    pub fn claims(
        &self,
        category: DiscountCategory,
    ) -> bool {
        match category {
            DiscountCategory::SeniorCitizen => self.is_senior_citizen,
            DiscountCategory::Pwd => self.is_pwd,
            DiscountCategory::Student => self.is_student,
        }
    }
}
