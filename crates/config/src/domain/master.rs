//! Master Domain Configuration
//!
//! Loads the housing domain YAML (embedded or from disk), orders the catalog and
//! validates cross-references before anything is handed to the engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use housing_advisor_core::{
    slot_keys, CalculatorParams, Intent, PolicyProgram, ProgramPurpose,
};

use super::appraisal::AppraisalConfig;
use super::intents::{IntentDefinition, SlotLabel};
use super::knowledge::KnowledgeConfig;
use super::topics::{KeywordGroups, TopicRule};
use super::vocabulary::VocabularyConfig;
use crate::constants::EXAMPLE_INPUT_COUNT;
use crate::ConfigError;

const BUILTIN_DOMAIN_YAML: &str =
    include_str!("../../../../config/domains/housing/domain.yaml");

/// Complete domain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterDomainConfig {
    pub domain_id: String,
    #[serde(default)]
    pub display_name: String,
    /// Catalog version label, surfaced in logs
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub calculator: CalculatorParams,
    /// Sorted by ascending priority after loading
    pub programs: Vec<PolicyProgram>,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Sorted by ascending priority after loading
    #[serde(default)]
    pub topics: Vec<TopicRule>,
    #[serde(default)]
    pub intents: Vec<IntentDefinition>,
    #[serde(default)]
    pub slot_labels: BTreeMap<String, SlotLabel>,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub appraisal: AppraisalConfig,
    /// Literal inputs the user can copy when nothing is known yet
    pub example_inputs: Vec<String>,
}

impl MasterDomainConfig {
    /// Parse the catalog embedded in the binary
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN_DOMAIN_YAML)
    }

    /// Load and validate a domain YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("Failed to read domain config: {}", e))
        })?;

        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            domain = %config.domain_id,
            programs = config.programs.len(),
            "Loaded domain configuration"
        );
        Ok(config)
    }

    /// Parse, order and validate a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: MasterDomainConfig = serde_yaml::from_str(content)?;

        config.programs.sort_by_key(|p| p.priority);
        config.topics.sort_by_key(|t| t.priority);

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-references and value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_calculator()?;
        self.validate_programs()?;
        self.validate_knowledge()?;
        self.validate_topics()?;
        self.validate_intents()?;
        self.validate_appraisal()?;

        if self.example_inputs.len() != EXAMPLE_INPUT_COUNT {
            return Err(ConfigError::invalid(
                "example_inputs",
                format!(
                    "Expected exactly {} example inputs, got {}",
                    EXAMPLE_INPUT_COUNT,
                    self.example_inputs.len()
                ),
            ));
        }

        for (name, list) in self.vocabulary.lists() {
            if list.is_empty() {
                tracing::warn!(list = name, "Vocabulary list is empty, its gates never fire");
            }
        }

        Ok(())
    }

    fn validate_calculator(&self) -> Result<(), ConfigError> {
        let calc = &self.calculator;

        let rates = [
            ("calculator.base_rate", calc.base_rate),
            ("calculator.illustrative_rate", calc.illustrative_rate),
            ("calculator.jeonse_conversion_rate", calc.jeonse_conversion_rate),
            ("calculator.jeonse_loan_rate", calc.jeonse_loan_rate),
        ];
        for (field, rate) in rates {
            check_rate(field, rate)?;
        }

        let percents = [
            ("calculator.max_ltv_percent", calc.max_ltv_percent),
            ("calculator.safe_ltv_percent", calc.safe_ltv_percent),
            ("calculator.jeonse_loan_ltv_percent", calc.jeonse_loan_ltv_percent),
        ];
        for (field, percent) in percents {
            if percent == 0 || percent > 100 {
                return Err(ConfigError::invalid(
                    field,
                    format!("Must be in (0, 100], got {}", percent),
                ));
            }
        }

        if !(calc.dsr_limit_percent > 0.0 && calc.dsr_limit_percent <= 100.0) {
            return Err(ConfigError::invalid(
                "calculator.dsr_limit_percent",
                format!("Must be in (0, 100], got {}", calc.dsr_limit_percent),
            ));
        }

        if calc.leverage_surcharge < 0.0 || calc.graduated_surcharge < 0.0 {
            return Err(ConfigError::invalid(
                "calculator",
                "Rate surcharges must not be negative",
            ));
        }

        Ok(())
    }

    fn validate_programs(&self) -> Result<(), ConfigError> {
        if !self
            .programs
            .iter()
            .any(|p| p.purpose == ProgramPurpose::Purchase)
        {
            return Err(ConfigError::MissingField(
                "programs: at least one purchase program".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for program in &self.programs {
            if !names.insert(program.name.as_str()) {
                return Err(ConfigError::invalid(
                    "programs",
                    format!("Duplicate program name '{}'", program.name),
                ));
            }
            if program.max_amount <= 0 {
                return Err(ConfigError::invalid(
                    format!("programs.{}.max_amount", program.name),
                    format!("Must be positive, got {}", program.max_amount),
                ));
            }
            check_rate(
                &format!("programs.{}.interest_rate", program.name),
                program.interest_rate,
            )?;
        }

        Ok(())
    }

    fn validate_knowledge(&self) -> Result<(), ConfigError> {
        for entry in &self.knowledge.glossary {
            if entry.definition.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("knowledge.glossary.{}", entry.term),
                    "Definition is empty",
                ));
            }
        }
        for faq in &self.knowledge.faqs {
            check_groups(&format!("knowledge.faqs.{}", faq.id), &faq.all_of, 1)?;
        }
        Ok(())
    }

    fn validate_topics(&self) -> Result<(), ConfigError> {
        for topic in &self.topics {
            check_groups(&format!("topics.{}", topic.id), &topic.all_of, 2)?;
            if topic.content.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("topics.{}.content", topic.id),
                    "Content is empty",
                ));
            }
        }
        Ok(())
    }

    fn validate_intents(&self) -> Result<(), ConfigError> {
        for intent in &self.intents {
            if Intent::from_name(&intent.name).is_none() {
                return Err(ConfigError::invalid(
                    "intents",
                    format!("Unknown intent '{}'", intent.name),
                ));
            }
            for slot in intent.all_slots() {
                if !slot_keys::ALL.contains(&slot) {
                    return Err(ConfigError::invalid(
                        format!("intents.{}", intent.name),
                        format!("Unknown slot key '{}'", slot),
                    ));
                }
            }
        }

        for key in self.slot_labels.keys() {
            if !slot_keys::ALL.contains(&key.as_str()) {
                tracing::warn!(slot = %key, "Label defined for unknown slot key");
            }
        }

        Ok(())
    }

    fn validate_appraisal(&self) -> Result<(), ConfigError> {
        let strategies = &self.appraisal.strategies;
        if strategies.is_empty() {
            return Err(ConfigError::MissingField("appraisal.strategies".to_string()));
        }

        let mut previous: Option<u32> = None;
        for (i, strategy) in strategies.iter().enumerate() {
            let is_last = i + 1 == strategies.len();
            match (strategy.max_gap_percent, is_last) {
                (None, false) => {
                    return Err(ConfigError::invalid(
                        "appraisal.strategies",
                        "Only the last band may be open-ended",
                    ));
                }
                (Some(max), _) => {
                    if previous.is_some_and(|p| max <= p) {
                        return Err(ConfigError::invalid(
                            "appraisal.strategies",
                            "Band thresholds must be strictly ascending",
                        ));
                    }
                    previous = Some(max);
                }
                (None, true) => {}
            }
        }

        Ok(())
    }

    /// Programs financing `purpose`, in priority order
    pub fn programs_for(&self, purpose: ProgramPurpose) -> impl Iterator<Item = &PolicyProgram> {
        self.programs.iter().filter(move |p| p.purpose == purpose)
    }

    /// Look up a program by canonical name
    pub fn find_program(&self, name: &str) -> Option<&PolicyProgram> {
        self.programs.iter().find(|p| p.name == name)
    }

    pub fn intent_definition(&self, intent: Intent) -> Option<&IntentDefinition> {
        self.intents.iter().find(|i| i.name == intent.as_str())
    }

    /// Required slot keys for `intent`; empty when the intent is not configured
    pub fn required_slots(&self, intent: Intent) -> &[String] {
        self.intent_definition(intent)
            .map(|d| d.required_slots.as_slice())
            .unwrap_or(&[])
    }

    /// Korean label for a slot key, falling back to the key itself
    pub fn slot_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.slot_labels
            .get(key)
            .map(|l| l.label.as_str())
            .unwrap_or(key)
    }

    pub fn slot_example(&self, key: &str) -> Option<&str> {
        self.slot_labels.get(key).and_then(|l| l.example.as_deref())
    }
}

fn check_rate(field: &str, rate: f64) -> Result<(), ConfigError> {
    if rate > 0.0 && rate < 100.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("Rate must be in (0, 100), got {}", rate),
        ))
    }
}

fn check_groups(field: &str, groups: &KeywordGroups, min: usize) -> Result<(), ConfigError> {
    if groups.len() < min {
        return Err(ConfigError::invalid(
            field,
            format!("Needs at least {} keyword groups, got {}", min, groups.len()),
        ));
    }
    if groups.iter().any(|g| g.iter().all(|k| k.trim().is_empty())) {
        return Err(ConfigError::invalid(field, "Keyword group is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> MasterDomainConfig {
        MasterDomainConfig::builtin().expect("builtin domain config must be valid")
    }

    #[test]
    fn test_builtin_loads() {
        let config = builtin();
        assert_eq!(config.domain_id, "housing");
        assert_eq!(config.example_inputs.len(), 3);
        assert!(config.programs_for(ProgramPurpose::Purchase).count() >= 1);
        assert!(!config.knowledge.glossary.is_empty());
        assert_eq!(config.appraisal.strategies.len(), 3);
    }

    #[test]
    fn test_programs_sorted_by_priority() {
        let config = builtin();
        let priorities: Vec<u32> = config.programs.iter().map(|p| p.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_purchase_required_slots() {
        let config = builtin();
        assert_eq!(
            config.required_slots(Intent::LoanPurchase),
            &["property_price", "down_payment", "income_monthly"]
        );
        assert!(config.required_slots(Intent::Glossary).is_empty());
        assert_eq!(config.slot_label("income_monthly"), "월소득");
        assert_eq!(config.slot_label("nonexistent"), "nonexistent");
    }

    #[test]
    fn test_topics_have_two_groups() {
        let config = builtin();
        assert!(config.topics.iter().all(|t| t.all_of.len() >= 2));
    }

    #[test]
    fn test_rejects_duplicate_program() {
        let mut config = builtin();
        let duplicate = config.programs[0].clone();
        config.programs.push(duplicate);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_rate() {
        let mut config = builtin();
        config.programs[0].interest_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = builtin();
        config.calculator.max_ltv_percent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_slot_key() {
        let mut config = builtin();
        config.intents[0].required_slots.push("salary".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_single_group_topic() {
        let mut config = builtin();
        config.topics[0].all_of.truncate(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_wrong_example_count() {
        let mut config = builtin();
        config.example_inputs.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unordered_bands() {
        let mut config = builtin();
        config.appraisal.strategies.swap(0, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_missing_purchase_program() {
        let mut config = builtin();
        config
            .programs
            .retain(|p| p.purpose != ProgramPurpose::Purchase);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            MasterDomainConfig::load("/nonexistent/domain.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_load_workspace_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/domains/housing/domain.yaml");
        let config = MasterDomainConfig::load(path).unwrap();
        assert_eq!(config.programs.len(), builtin().programs.len());
    }
}
