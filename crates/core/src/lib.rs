//! Core types for the housing finance advisor
//!
//! This crate provides the foundational types used across all other crates:
//! - Conversation slots (`Fields`) and their enumerations
//! - The closed intent set
//! - The response contract (`Response`, `Card`, `Confidence`)
//! - Policy programs and loan scenarios
//! - The loan calculator trait and pure finance functions
//! - Calculator errors

pub mod conversation;
pub mod domain;
pub mod error;
pub mod fields;
pub mod intent;
pub mod response;
pub mod traits;

pub use conversation::{Turn, TurnRole};
pub use domain::{EligibilityRule, LoanScenario, PolicyProgram, ProgramPurpose, ScenarioKind};
pub use error::CalculatorError;
pub use fields::{
    is_valid_amount, slot_keys, Fields, MaritalStatus, PropertyType, Purpose, Region,
    DEFAULT_LOAN_PERIOD_YEARS, MAX_AMOUNT, MAX_LOAN_PERIOD_YEARS,
};
pub use intent::Intent;
pub use response::{Card, Confidence, Response, ResponseBuilder};
pub use traits::{percent_of, CalculatorParams, ConfigDrivenCalculator, LoanCalculator};
