//! Repayment-type schedules
//!
//! Three ways to pay back the same principal:
//! - equal installment (원리금균등): constant payment
//! - graduated (체증식): interest-only grace period, then equal installments on the
//!   remaining term, at a small rate surcharge
//! - equal principal (원금균등): constant principal slice plus declining interest

use serde::{Deserialize, Serialize};

use housing_advisor_core::traits::monthly_rate;
use housing_advisor_core::LoanCalculator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentType {
    EqualInstallment,
    Graduated,
    EqualPrincipal,
}

impl RepaymentType {
    pub const ALL: [RepaymentType; 3] = [
        RepaymentType::EqualInstallment,
        RepaymentType::Graduated,
        RepaymentType::EqualPrincipal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RepaymentType::EqualInstallment => "원리금균등",
            RepaymentType::Graduated => "체증식(거치 후 원리금균등)",
            RepaymentType::EqualPrincipal => "원금균등",
        }
    }
}

/// Condensed view of one schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentSummary {
    pub repayment_type: RepaymentType,
    pub interest_rate: f64,
    pub first_payment: i64,
    pub last_payment: i64,
    pub total_interest: i64,
}

/// Annual rate a repayment type is charged at, given the base rate
pub fn effective_rate(calculator: &dyn LoanCalculator, kind: RepaymentType, base_rate: f64) -> f64 {
    match kind {
        RepaymentType::Graduated => base_rate + calculator.params().graduated_surcharge,
        _ => base_rate,
    }
}

/// Every monthly payment of the schedule, in order
pub fn payment_schedule(
    calculator: &dyn LoanCalculator,
    kind: RepaymentType,
    principal: i64,
    base_rate: f64,
    term_years: u32,
) -> Vec<i64> {
    let months = term_years * 12;
    if principal <= 0 || months == 0 {
        return Vec::new();
    }
    let rate = effective_rate(calculator, kind, base_rate);

    match kind {
        RepaymentType::EqualInstallment => {
            let payment = calculator.amortized_payment(principal, rate, months);
            vec![payment; months as usize]
        }
        RepaymentType::Graduated => {
            let grace_years = calculator.params().graduated_grace_years.min(term_years);
            let grace_months = grace_years * 12;
            let remaining = months - grace_months;
            let interest_only = calculator.monthly_interest(principal, rate);

            let mut payments = vec![interest_only; grace_months as usize];
            if remaining == 0 {
                // Grace covers the whole term: principal is due with the last payment
                if let Some(last) = payments.last_mut() {
                    *last += principal;
                }
            } else {
                let payment = calculator.amortized_payment(principal, rate, remaining);
                payments.extend(std::iter::repeat(payment).take(remaining as usize));
            }
            payments
        }
        RepaymentType::EqualPrincipal => {
            let r = monthly_rate(rate);
            let slice = principal / months as i64;
            let mut balance = principal;
            (0..months)
                .map(|month| {
                    let repaid = if month + 1 == months { balance } else { slice };
                    let interest = (balance as f64 * r).round() as i64;
                    balance -= repaid;
                    repaid + interest
                })
                .collect()
        }
    }
}

pub fn summarize(
    calculator: &dyn LoanCalculator,
    kind: RepaymentType,
    principal: i64,
    base_rate: f64,
    term_years: u32,
) -> RepaymentSummary {
    let payments = payment_schedule(calculator, kind, principal, base_rate, term_years);
    let paid: i64 = payments.iter().sum();
    RepaymentSummary {
        repayment_type: kind,
        interest_rate: effective_rate(calculator, kind, base_rate),
        first_payment: payments.first().copied().unwrap_or(0),
        last_payment: payments.last().copied().unwrap_or(0),
        total_interest: if payments.is_empty() { 0 } else { paid - principal },
    }
}

/// Summaries of all three repayment types for the same loan
pub fn compare_repayment_types(
    calculator: &dyn LoanCalculator,
    principal: i64,
    base_rate: f64,
    term_years: u32,
) -> Vec<RepaymentSummary> {
    RepaymentType::ALL
        .iter()
        .map(|kind| summarize(calculator, *kind, principal, base_rate, term_years))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_advisor_core::ConfigDrivenCalculator;

    #[test]
    fn test_equal_installment_matches_amortized() {
        let calc = ConfigDrivenCalculator::default();
        let summary = summarize(&calc, RepaymentType::EqualInstallment, 300_000_000, 4.2, 30);
        let payment = calc.amortized_payment(300_000_000, 4.2, 360);
        assert_eq!(summary.first_payment, payment);
        assert_eq!(summary.last_payment, payment);
        assert_eq!(summary.total_interest, calc.total_interest(300_000_000, 4.2, 360));
    }

    #[test]
    fn test_graduated_grace_then_amortized() {
        let calc = ConfigDrivenCalculator::default();
        let schedule = payment_schedule(&calc, RepaymentType::Graduated, 300_000_000, 4.2, 30);
        assert_eq!(schedule.len(), 360);

        // 4.5% interest only for 5 years
        let interest_only = calc.monthly_interest(300_000_000, 4.5);
        assert_eq!(schedule[0], interest_only);
        assert_eq!(schedule[59], interest_only);
        assert_eq!(schedule[60], calc.amortized_payment(300_000_000, 4.5, 300));

        let summary = summarize(&calc, RepaymentType::Graduated, 300_000_000, 4.2, 30);
        assert!((summary.interest_rate - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_graduated_short_term() {
        let calc = ConfigDrivenCalculator::default();
        let schedule = payment_schedule(&calc, RepaymentType::Graduated, 12_000_000, 4.2, 3);
        assert_eq!(schedule.len(), 36);
        let interest_only = calc.monthly_interest(12_000_000, 4.5);
        assert_eq!(schedule[35], interest_only + 12_000_000);
    }

    #[test]
    fn test_equal_principal_declines_linearly() {
        let calc = ConfigDrivenCalculator::default();
        let schedule =
            payment_schedule(&calc, RepaymentType::EqualPrincipal, 120_000_000, 6.0, 10);
        assert_eq!(schedule.len(), 120);
        // slice 1,000,000 + 0.5% of 1.2억
        assert_eq!(schedule[0], 1_600_000);
        assert_eq!(schedule[1], 1_595_000);
        assert_eq!(schedule[119], 1_005_000);
        assert!(schedule.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_equal_principal_pays_less_interest() {
        let calc = ConfigDrivenCalculator::default();
        let summaries = compare_repayment_types(&calc, 300_000_000, 4.2, 30);
        assert_eq!(summaries.len(), 3);
        let installment = &summaries[0];
        let principal = &summaries[2];
        assert!(principal.total_interest < installment.total_interest);
        assert!(principal.first_payment > installment.first_payment);
    }

    #[test]
    fn test_zero_principal() {
        let calc = ConfigDrivenCalculator::default();
        let summary = summarize(&calc, RepaymentType::EqualPrincipal, 0, 4.2, 30);
        assert_eq!(summary.first_payment, 0);
        assert_eq!(summary.total_interest, 0);
    }
}
