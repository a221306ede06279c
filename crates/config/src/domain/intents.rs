//! Intent Configuration
//!
//! Required and optional slots per intent, plus the Korean labels used when asking
//! for missing slots.

use serde::{Deserialize, Serialize};

/// Single intent definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefinition {
    /// Intent name, one of the closed intent identifiers
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Slots that must be known before a precise answer is possible
    #[serde(default)]
    pub required_slots: Vec<String>,
    #[serde(default)]
    pub optional_slots: Vec<String>,
}

impl IntentDefinition {
    /// Get all slots (required + optional)
    pub fn all_slots(&self) -> Vec<&str> {
        self.required_slots
            .iter()
            .chain(self.optional_slots.iter())
            .map(|s| s.as_str())
            .collect()
    }
}

/// How a slot is named to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLabel {
    /// Korean display name ("월소득")
    pub label: String,
    /// Copyable input fragment ("월소득 500만")
    #[serde(default)]
    pub example: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_definition_deserialization() {
        let yaml = r#"
name: loan_purchase
description: "Purchase loan"
required_slots: [property_price, down_payment]
optional_slots: [region]
"#;
        let intent: IntentDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(intent.required_slots, vec!["property_price", "down_payment"]);
        assert_eq!(intent.all_slots().len(), 3);
    }
}
