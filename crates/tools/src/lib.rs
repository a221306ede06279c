//! Loan and Eligibility Calculators
//!
//! Pure financial functions behind every numeric answer:
//! - three-scenario generation (max-leverage, safe, policy-assisted)
//! - repayment-type schedules (equal installment, graduated, equal principal)
//! - policy-program eligibility matching
//! - jeonse / monthly-rent conversion
//! - acquisition tax and brokerage estimate
//! - appraisal gap
//!
//! Nothing here reads configuration or keeps state; rates and percentages arrive
//! through `LoanCalculator::params`.

pub mod appraisal;
pub mod eligibility;
pub mod rent;
pub mod repayment;
pub mod scenario;
pub mod tax;

pub use appraisal::AppraisalGap;
pub use eligibility::{
    evaluate_programs, find_matching_programs, find_matching_programs_for, EligibilityReport,
};
pub use rent::{compare_jeonse, jeonse_equivalent_deposit, monthly_rent_equivalent, JeonseComparison};
pub use repayment::{
    compare_repayment_types, payment_schedule, summarize, RepaymentSummary, RepaymentType,
};
pub use scenario::{generate_scenarios, select_policy_program, ScenarioInput};
pub use tax::{AcquisitionCost, FIRST_TIME_RELIEF_CAP, FIRST_TIME_RELIEF_PRICE_LIMIT};
