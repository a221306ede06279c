//! Jeonse / monthly-rent conversion
//!
//! Converts between a jeonse deposit and monthly rent at the configured conversion rate
//! (전월세 전환율) and prices a jeonse loan against the deposit.

use serde::Serialize;

use housing_advisor_core::{percent_of, LoanCalculator};

/// Monthly rent equivalent of a jeonse deposit: `deposit × rate / 100 / 12`
pub fn monthly_rent_equivalent(deposit: i64, conversion_rate: f64) -> i64 {
    (deposit as f64 * conversion_rate / 100.0 / 12.0).round() as i64
}

/// Jeonse deposit equivalent of a (deposit, monthly rent) lease:
/// `deposit + rent × 12 / (rate / 100)`
pub fn jeonse_equivalent_deposit(deposit: i64, monthly_rent: i64, conversion_rate: f64) -> Option<i64> {
    if conversion_rate <= 0.0 {
        return None;
    }
    let converted = monthly_rent as f64 * 12.0 / (conversion_rate / 100.0);
    Some(deposit.saturating_add(converted.round() as i64))
}

/// Jeonse-versus-rent comparison for one deposit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JeonseComparison {
    pub deposit: i64,
    /// Monthly rent the deposit converts to
    pub monthly_equivalent: i64,
    /// Portion of the deposit a jeonse loan covers
    pub loan_amount: i64,
    pub loan_rate: f64,
    /// Monthly interest on `loan_amount`
    pub loan_monthly_interest: i64,
    /// Set when a monthly rent was quoted as well
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_rent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_jeonse_equivalent: Option<i64>,
}

pub fn compare_jeonse(
    calculator: &dyn LoanCalculator,
    deposit: i64,
    monthly_rent: Option<i64>,
) -> JeonseComparison {
    let params = calculator.params();
    let loan_amount = percent_of(deposit, params.jeonse_loan_ltv_percent);

    JeonseComparison {
        deposit,
        monthly_equivalent: monthly_rent_equivalent(deposit, params.jeonse_conversion_rate),
        loan_amount,
        loan_rate: params.jeonse_loan_rate,
        loan_monthly_interest: calculator.monthly_interest(loan_amount, params.jeonse_loan_rate),
        quoted_rent: monthly_rent,
        quoted_jeonse_equivalent: monthly_rent.and_then(|rent| {
            jeonse_equivalent_deposit(deposit, rent, params.jeonse_conversion_rate)
        }),
    }
}
