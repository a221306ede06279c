//! Keyword vocabulary
//!
//! Keyword lists that gate intents and handlers. Matching is done on lowercased text
//! with whitespace removed, so "첫 집" also matches "첫집".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Purchase purpose (매매, 구입)
    pub purchase: Vec<String>,
    /// Jeonse/monthly rent purpose
    pub jeonse: Vec<String>,
    /// Refinancing purpose
    pub refi: Vec<String>,
    /// Taxes and transaction fees
    pub tax: Vec<String>,
    /// Acquisition-tax relief / first-time buyer wording
    pub relief: Vec<String>,
    /// Period and timing questions
    pub timing: Vec<String>,
    pub comparison: Vec<String>,
    pub newlywed: Vec<String>,
    /// Loan/program vocabulary paired with newlywed wording
    pub loan: Vec<String>,
    /// Emotional distress wording
    pub distress: Vec<String>,
    /// Appraisal and loan-limit vocabulary
    pub appraisal: Vec<String>,
    /// Anything that marks the message as being about housing finance
    pub in_domain: Vec<String>,
}

impl VocabularyConfig {
    /// Named lists, used for validation and diagnostics
    pub fn lists(&self) -> [(&'static str, &[String]); 12] {
        [
            ("purchase", self.purchase.as_slice()),
            ("jeonse", self.jeonse.as_slice()),
            ("refi", self.refi.as_slice()),
            ("tax", self.tax.as_slice()),
            ("relief", self.relief.as_slice()),
            ("timing", self.timing.as_slice()),
            ("comparison", self.comparison.as_slice()),
            ("newlywed", self.newlywed.as_slice()),
            ("loan", self.loan.as_slice()),
            ("distress", self.distress.as_slice()),
            ("appraisal", self.appraisal.as_slice()),
            ("in_domain", self.in_domain.as_slice()),
        ]
    }
}
