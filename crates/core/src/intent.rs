//! Closed set of advisory intents
//!
//! Intents are derived per message and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    LoanPurchase,
    LoanJeonse,
    LoanRefi,
    PolicyQuestion,
    CostsTax,
    Glossary,
    #[default]
    General,
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Intent::LoanPurchase,
        Intent::LoanJeonse,
        Intent::LoanRefi,
        Intent::PolicyQuestion,
        Intent::CostsTax,
        Intent::Glossary,
        Intent::General,
    ];

    /// Identifier used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::LoanPurchase => "loan_purchase",
            Intent::LoanJeonse => "loan_jeonse",
            Intent::LoanRefi => "loan_refi",
            Intent::PolicyQuestion => "policy_question",
            Intent::CostsTax => "costs_tax",
            Intent::Glossary => "glossary",
            Intent::General => "general",
        }
    }

    pub fn from_name(name: &str) -> Option<Intent> {
        Self::ALL.iter().copied().find(|i| i.as_str() == name)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::from_name(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::from_name("unknown"), None);
    }
}
