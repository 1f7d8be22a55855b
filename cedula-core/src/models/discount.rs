use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A demographic category that may reduce the community tax due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountCategory {
    SeniorCitizen,
    Pwd,
    Student,
}

impl DiscountCategory {
    /// Every category in tie-break order: earlier entries win when two
    /// categories carry the same rate.
    pub const PRECEDENCE: [DiscountCategory; 3] = [
        DiscountCategory::SeniorCitizen,
        DiscountCategory::Pwd,
        DiscountCategory::Student,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeniorCitizen => "senior_citizen",
            Self::Pwd => "pwd",
            Self::Student => "student",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SeniorCitizen => "Senior Citizen",
            Self::Pwd => "Person with Disability",
            Self::Student => "Student",
        }
    }
}

impl fmt::Display for DiscountCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Policy switches: whether each discount category is honored at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscountEligibility {
    pub senior_citizen: bool,
    pub pwd: bool,
    pub student: bool,
}

impl DiscountEligibility {
    /// Every category switched on.
    pub fn all() -> Self {
        Self {
            senior_citizen: true,
            pwd: true,
            student: true,
        }
    }

    pub fn is_enabled(
        &self,
        category: DiscountCategory,
    ) -> bool {
        match category {
            DiscountCategory::SeniorCitizen => self.senior_citizen,
            DiscountCategory::Pwd => self.pwd,
            DiscountCategory::Student => self.student,
        }
    }
}

/// Percentage discount per category, expressed as a fraction (`0.20` = 20%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscountRates {
    pub senior_citizen: Decimal,
    pub pwd: Decimal,
    pub student: Decimal,
}

impl DiscountRates {
    pub fn rate_for(
        &self,
        category: DiscountCategory,
    ) -> Decimal {
        match category {
            DiscountCategory::SeniorCitizen => self.senior_citizen,
            DiscountCategory::Pwd => self.pwd,
            DiscountCategory::Student => self.student,
        }
    }
}

impl Default for DiscountRates {
    /// 20% for senior citizens and PWDs, 10% for students.
    fn default() -> Self {
        Self {
            senior_citizen: Decimal::new(20, 2),
            pwd: Decimal::new(20, 2),
            student: Decimal::new(10, 2),
        }
    }
}
