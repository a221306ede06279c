//! Domain reference types
//!
//! Policy programs are immutable catalog data loaded from configuration; scenarios are
//! computed fresh per request.

mod policy;
mod scenario;

pub use policy::{EligibilityRule, PolicyProgram, ProgramPurpose};
pub use scenario::{LoanScenario, ScenarioKind};
