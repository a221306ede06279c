//! Loan scenario result type

use serde::{Deserialize, Serialize};

/// Which of the three structurings a scenario represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    MaxLeverage,
    Safe,
    PolicyAssisted,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::MaxLeverage,
        ScenarioKind::Safe,
        ScenarioKind::PolicyAssisted,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ScenarioKind::MaxLeverage => "최대 레버리지",
            ScenarioKind::Safe => "안전 상환",
            ScenarioKind::PolicyAssisted => "정책자금 활용",
        }
    }
}

/// One computed loan structuring.
///
/// `ltv = loan_amount / property_price × 100` and
/// `dsr = monthly_payment / income_monthly × 100` always hold for the stored values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanScenario {
    pub kind: ScenarioKind,
    pub title: String,
    pub description: String,
    pub loan_amount: i64,
    pub interest_rate: f64,
    pub monthly_payment: i64,
    pub total_interest: i64,
    pub total_payment: i64,
    pub ltv: f64,
    /// Absent when income is unknown
    pub dsr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_program: Option<String>,
    pub advantages: Vec<String>,
    pub considerations: Vec<String>,
}
