//! Policy-program eligibility matching
//!
//! A program matches when every condition of its rule holds for the profile. There is
//! no partial or fuzzy matching; [`evaluate_programs`] reports what failed instead.

use serde::Serialize;

use housing_advisor_core::{Fields, PolicyProgram, ProgramPurpose};

/// Eligibility verdict for one program
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub program: String,
    pub eligible: bool,
    /// Conditions the profile fails, empty when eligible
    pub unmet: Vec<String>,
}

/// Programs whose predicate accepts `profile`, ordered by ascending priority
pub fn find_matching_programs<'a>(
    programs: &'a [PolicyProgram],
    profile: &Fields,
) -> Vec<&'a PolicyProgram> {
    let mut matching: Vec<&PolicyProgram> =
        programs.iter().filter(|p| p.is_eligible(profile)).collect();
    matching.sort_by_key(|p| p.priority);
    matching
}

/// Matching programs restricted to one purpose
pub fn find_matching_programs_for<'a>(
    programs: &'a [PolicyProgram],
    purpose: ProgramPurpose,
    profile: &Fields,
) -> Vec<&'a PolicyProgram> {
    find_matching_programs(programs, profile)
        .into_iter()
        .filter(|p| p.purpose == purpose)
        .collect()
}

/// Verdict for every program, in priority order
pub fn evaluate_programs(programs: &[PolicyProgram], profile: &Fields) -> Vec<EligibilityReport> {
    let mut ordered: Vec<&PolicyProgram> = programs.iter().collect();
    ordered.sort_by_key(|p| p.priority);
    ordered
        .into_iter()
        .map(|program| {
            let unmet = program.eligibility.unmet_conditions(profile);
            EligibilityReport {
                program: program.name.clone(),
                eligible: unmet.is_empty(),
                unmet,
            }
        })
        .collect()
}
