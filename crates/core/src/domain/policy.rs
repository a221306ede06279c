//! Policy loan programs
//!
//! Government/institution-backed loan products. Each program carries its own terms and
//! an eligibility rule evaluated against the caller's accumulated profile.

use serde::{Deserialize, Serialize};

use crate::fields::{Fields, MaritalStatus};

/// What a program finances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramPurpose {
    Purchase,
    Jeonse,
    Refi,
}

/// Eligibility predicate: a plain conjunction of ceilings and categorical flags.
///
/// Numeric ceilings pass when the profile value is unknown, since the user simply has
/// not told us yet. Categorical requirements need an explicit match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityRule {
    /// Household annual income ceiling in won
    pub max_annual_income: Option<i64>,
    /// Worst credit grade accepted (1 best, 10 worst)
    pub max_credit_tier: Option<u8>,
    pub max_property_price: Option<i64>,
    pub requires_first_time_buyer: bool,
    pub requires_newborn: bool,
    pub requires_children: bool,
    /// Allowed marital statuses; empty means any
    pub marital_statuses: Vec<MaritalStatus>,
}

impl EligibilityRule {
    pub fn is_satisfied_by(&self, profile: &Fields) -> bool {
        self.unmet_conditions(profile).is_empty()
    }

    /// Human-readable list of conditions the profile fails
    pub fn unmet_conditions(&self, profile: &Fields) -> Vec<String> {
        let mut unmet = Vec::new();

        if let (Some(ceiling), Some(annual)) = (self.max_annual_income, profile.annual_income()) {
            if annual > ceiling {
                unmet.push(format!("연소득 {}만원 이하", ceiling / 10_000));
            }
        }
        if let (Some(ceiling), Some(tier)) = (self.max_credit_tier, profile.credit_tier) {
            if tier > ceiling {
                unmet.push(format!("신용 {}등급 이내", ceiling));
            }
        }
        if let (Some(ceiling), Some(price)) = (self.max_property_price, profile.property_price) {
            if price > ceiling {
                unmet.push(format!("주택가격 {}만원 이하", ceiling / 10_000));
            }
        }
        if self.requires_first_time_buyer && profile.first_time_buyer != Some(true) {
            unmet.push("생애최초 주택 구입".to_string());
        }
        if self.requires_newborn && profile.has_newborn != Some(true) {
            unmet.push("최근 출산 가구".to_string());
        }
        if self.requires_children && profile.has_children != Some(true) {
            unmet.push("자녀 가구".to_string());
        }
        if !self.marital_statuses.is_empty()
            && !self.marital_statuses.contains(&profile.marital_status)
        {
            unmet.push("혼인 요건".to_string());
        }

        unmet
    }
}

/// Catalog entry for one policy loan program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyProgram {
    pub name: String,
    /// Alternative spellings users type (matched with spaces removed)
    #[serde(default)]
    pub aliases: Vec<String>,
    pub purpose: ProgramPurpose,
    /// Loan ceiling in won
    pub max_amount: i64,
    /// Annual rate (percent)
    pub interest_rate: f64,
    #[serde(default)]
    pub conditions: Vec<String>,
    /// Which income documents count and over what period
    #[serde(default)]
    pub income_verification: Option<String>,
    /// Lower is preferred
    pub priority: u32,
    #[serde(default)]
    pub eligibility: EligibilityRule,
}

impl PolicyProgram {
    pub fn is_eligible(&self, profile: &Fields) -> bool {
        self.eligibility.is_satisfied_by(profile)
    }

    /// Canonical name followed by aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
