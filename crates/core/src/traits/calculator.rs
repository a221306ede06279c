//! Loan calculator trait for housing finance math
//!
//! Every number the advisor shows goes through this interface: amortized payments,
//! LTV/DSR ratios and the inverse "how much can I borrow" computation. Rate constants
//! and scenario percentages come from the domain configuration, so the same trait can
//! be driven by a different catalog or a test fixture.
//!
//! # Example
//!
//! ```ignore
//! use housing_advisor_core::traits::{ConfigDrivenCalculator, LoanCalculator};
//!
//! let calc = ConfigDrivenCalculator::new(params);
//! let monthly = calc.amortized_payment(300_000_000, 4.2, 360);
//! let dsr = calc.dsr_percent(monthly, 5_000_000);
//! ```

use serde::{Deserialize, Serialize};

/// Rate constants and scenario percentages loaded from config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorParams {
    /// Base annual mortgage rate (percent)
    pub base_rate: f64,
    /// Added to the base rate for the max-leverage scenario
    pub leverage_surcharge: f64,
    /// LTV cap for the max-leverage and policy scenarios
    pub max_ltv_percent: u32,
    /// LTV cap for the safe scenario
    pub safe_ltv_percent: u32,
    /// Safe scenario caps the loan at this many years of income
    pub safe_income_years: u32,
    /// Rate used for assumption-based estimates
    pub illustrative_rate: f64,
    /// Regulatory DSR ceiling (percent)
    pub dsr_limit_percent: f64,
    /// Rate surcharge for the graduated repayment schedule
    pub graduated_surcharge: f64,
    /// Interest-only grace period of the graduated schedule
    pub graduated_grace_years: u32,
    /// Jeonse-to-monthly-rent conversion rate (annual percent)
    pub jeonse_conversion_rate: f64,
    pub jeonse_loan_rate: f64,
    pub jeonse_loan_ltv_percent: u32,
}

impl Default for CalculatorParams {
    fn default() -> Self {
        Self {
            base_rate: 4.2,
            leverage_surcharge: 0.3,
            max_ltv_percent: 80,
            safe_ltv_percent: 60,
            safe_income_years: 5,
            illustrative_rate: 4.5,
            dsr_limit_percent: 40.0,
            graduated_surcharge: 0.3,
            graduated_grace_years: 5,
            jeonse_conversion_rate: 3.6,
            jeonse_loan_rate: 3.8,
            jeonse_loan_ltv_percent: 80,
        }
    }
}

/// Monthly rate from an annual percentage
pub fn monthly_rate(annual_rate: f64) -> f64 {
    annual_rate / 100.0 / 12.0
}

/// Amortized (equal-installment) monthly payment, rounded to the nearest won.
///
/// A zero or negative rate takes the linear branch `principal / months`.
/// Zero months is treated as a single payment of the whole principal.
pub fn amortized_payment(principal: i64, annual_rate: f64, months: u32) -> i64 {
    if months == 0 {
        return principal;
    }
    let r = monthly_rate(annual_rate);
    let p = principal as f64;

    if r <= 0.0 {
        return (p / months as f64).round() as i64;
    }

    let factor = (1.0 + r).powi(months as i32);
    (p * r * factor / (factor - 1.0)).round() as i64
}

/// Largest principal whose amortized payment does not exceed `payment`
pub fn max_principal_for_payment(payment: i64, annual_rate: f64, months: u32) -> i64 {
    if payment <= 0 || months == 0 {
        return 0;
    }
    let r = monthly_rate(annual_rate);
    let pay = payment as f64;

    if r <= 0.0 {
        return payment.saturating_mul(months as i64);
    }

    let factor = (1.0 + r).powi(months as i32);
    (pay * (factor - 1.0) / (r * factor)).floor() as i64
}

/// `amount × percent / 100` in whole won, saturating instead of overflowing
pub fn percent_of(amount: i64, percent: u32) -> i64 {
    amount.saturating_mul(percent as i64) / 100
}

/// `part / whole × 100`, or `None` when `whole` is not positive
pub fn ratio_percent(part: i64, whole: i64) -> Option<f64> {
    if whole <= 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}

/// Housing loan calculator
///
/// Ratios are plain; nothing is clamped. A DSR above 100 is a red flag for the
/// caller to explain, not an error.
pub trait LoanCalculator: Send + Sync {
    /// Parameters this calculator was built from
    fn params(&self) -> &CalculatorParams;

    /// Equal-installment monthly payment
    ///
    /// `payment = P × r(1+r)^n / ((1+r)^n − 1)` with `r = annual_rate/100/12`,
    /// rounded to the nearest won.
    fn amortized_payment(&self, principal: i64, annual_rate: f64, months: u32) -> i64 {
        amortized_payment(principal, annual_rate, months)
    }

    /// `payment × months − principal`
    fn total_interest(&self, principal: i64, annual_rate: f64, months: u32) -> i64 {
        let months_paid = months.max(1) as i64;
        self.amortized_payment(principal, annual_rate, months)
            .saturating_mul(months_paid)
            .saturating_sub(principal)
    }

    /// `loan / price × 100`
    fn ltv_percent(&self, loan_amount: i64, property_price: i64) -> Option<f64> {
        ratio_percent(loan_amount, property_price)
    }

    /// `monthly_payment / income × 100`; `None` when income is zero or unknown
    fn dsr_percent(&self, monthly_payment: i64, income_monthly: i64) -> Option<f64> {
        ratio_percent(monthly_payment, income_monthly)
    }

    /// One month of interest on `principal`
    fn monthly_interest(&self, principal: i64, annual_rate: f64) -> i64 {
        (principal as f64 * monthly_rate(annual_rate)).round() as i64
    }

    fn max_principal_for_payment(&self, payment: i64, annual_rate: f64, months: u32) -> i64 {
        max_principal_for_payment(payment, annual_rate, months)
    }

    fn base_rate(&self) -> f64 {
        self.params().base_rate
    }

    /// Rate of the max-leverage scenario
    fn leverage_rate(&self) -> f64 {
        self.params().base_rate + self.params().leverage_surcharge
    }

    fn illustrative_rate(&self) -> f64 {
        self.params().illustrative_rate
    }

    fn dsr_limit_percent(&self) -> f64 {
        self.params().dsr_limit_percent
    }
}

/// Config-driven calculator implementation
///
/// Created from the `calculator` section of the domain configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigDrivenCalculator {
    params: CalculatorParams,
}

impl ConfigDrivenCalculator {
    pub fn new(params: CalculatorParams) -> Self {
        Self { params }
    }
}

impl LoanCalculator for ConfigDrivenCalculator {
    fn params(&self) -> &CalculatorParams {
        &self.params
    }
}
