//! Core traits for the housing advisor
//!
//! - `LoanCalculator`: amortization, LTV/DSR and borrowing capacity

mod calculator;

pub use calculator::{
    amortized_payment, max_principal_for_payment, monthly_rate, percent_of, ratio_percent,
    CalculatorParams, ConfigDrivenCalculator, LoanCalculator,
};
