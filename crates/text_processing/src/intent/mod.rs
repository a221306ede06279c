//! Intent Classification
//!
//! Maps one message (plus the caller's accumulated profile) to a closed set of intents
//! and reports which required slots are still missing. Required slots and their Korean
//! labels come from the domain config, so the classifier only owns the decision order:
//!
//! 1. explicit purpose keywords (매매 → purchase, 전세 → jeonse, 대환 → refi)
//! 2. a named policy program → `policy_question`
//! 3. tax / fee keywords → `costs_tax`
//! 4. financial term (DSR, LTV, 근저당, ...) → `glossary`
//! 5. the purpose already known from the profile
//! 6. `general`

use std::sync::Arc;

use serde::Serialize;

use housing_advisor_config::MasterDomainConfig;
use housing_advisor_core::{Fields, Intent, Purpose};

use crate::korean::NormalizedText;
use crate::slot_extraction::SlotExtractor;

/// Result of classifying one message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub intent: Intent,
    /// Slots found in this message alone
    pub slots: Fields,
    /// Profile merged with `slots`; what handlers compute from
    pub merged: Fields,
    /// Required slot keys absent from `merged`, in configured order
    pub missing: Vec<String>,
    /// Korean labels for `missing`, same order
    pub missing_labels: Vec<String>,
}

impl Classification {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Rule-based intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    config: Arc<MasterDomainConfig>,
    extractor: SlotExtractor,
}

impl IntentClassifier {
    pub fn new(config: Arc<MasterDomainConfig>) -> Self {
        let extractor = SlotExtractor::from_config(&config);
        Self { config, extractor }
    }

    pub fn extractor(&self) -> &SlotExtractor {
        &self.extractor
    }

    /// Classify a message with no prior profile
    pub fn classify(&self, text: &str) -> Classification {
        self.classify_with_profile(text, &Fields::default())
    }

    pub fn classify_with_profile(&self, text: &str, profile: &Fields) -> Classification {
        self.classify_normalized(&NormalizedText::new(text), profile)
    }

    pub fn classify_normalized(&self, text: &NormalizedText, profile: &Fields) -> Classification {
        let slots = self.extractor.extract_normalized(text);
        let merged = profile.merge(&slots);
        let intent = self.detect_intent(text, &slots, &merged);

        let missing: Vec<String> = self
            .config
            .required_slots(intent)
            .iter()
            .filter(|key| !merged.has_slot(key))
            .cloned()
            .collect();
        let missing_labels = missing
            .iter()
            .map(|key| self.config.slot_label(key).to_string())
            .collect();

        tracing::debug!(
            intent = %intent,
            missing = ?missing,
            "Classified message"
        );

        Classification {
            intent,
            slots,
            merged,
            missing,
            missing_labels,
        }
    }

    fn detect_intent(&self, text: &NormalizedText, slots: &Fields, merged: &Fields) -> Intent {
        if let Some(intent) = purpose_intent(slots.purpose) {
            return intent;
        }
        if slots.policy_mention.is_some() {
            return Intent::PolicyQuestion;
        }
        if text.contains_any(&self.config.vocabulary.tax) {
            return Intent::CostsTax;
        }
        if self
            .config
            .knowledge
            .glossary_terms()
            .any(|term| text.contains(term))
        {
            return Intent::Glossary;
        }
        purpose_intent(merged.purpose).unwrap_or(Intent::General)
    }
}

fn purpose_intent(purpose: Purpose) -> Option<Intent> {
    match purpose {
        Purpose::Purchase => Some(Intent::LoanPurchase),
        Purpose::Jeonse => Some(Intent::LoanJeonse),
        Purpose::Refi => Some(Intent::LoanRefi),
        Purpose::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_advisor_core::slot_keys;

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(Arc::new(MasterDomainConfig::builtin().unwrap()))
    }

    #[test]
    fn test_purchase_with_all_slots() {
        let result = classifier().classify("매매 5억, 자기자본 1억, 월소득 500만");
        assert_eq!(result.intent, Intent::LoanPurchase);
        assert!(result.is_complete());
    }

    #[test]
    fn test_purchase_reports_missing_in_order() {
        let result = classifier().classify("5억 아파트 매매하려고요");
        assert_eq!(result.intent, Intent::LoanPurchase);
        assert_eq!(
            result.missing,
            vec![
                slot_keys::DOWN_PAYMENT.to_string(),
                slot_keys::INCOME_MONTHLY.to_string()
            ]
        );
        assert_eq!(result.missing_labels, vec!["자기자본", "월소득"]);
    }

    #[test]
    fn test_profile_fills_missing() {
        let profile = Fields {
            income_monthly: Some(4_000_000),
            down_payment: Some(80_000_000),
            ..Default::default()
        };
        let result = classifier().classify_with_profile("매매 4억 가능할까요", &profile);
        assert!(result.is_complete());
        assert_eq!(result.slots.income_monthly, None);
        assert_eq!(result.merged.income_monthly, Some(4_000_000));
    }

    #[test]
    fn test_decision_order() {
        let classifier = classifier();
        assert_eq!(classifier.classify("전세 3억").intent, Intent::LoanJeonse);
        assert_eq!(classifier.classify("대환 가능할까요").intent, Intent::LoanRefi);
        assert_eq!(
            classifier.classify("보금자리론 조건 알려줘").intent,
            Intent::PolicyQuestion
        );
        assert_eq!(classifier.classify("취득세 얼마나 나와?").intent, Intent::CostsTax);
        assert_eq!(classifier.classify("DSR이 뭐야").intent, Intent::Glossary);
        assert_eq!(classifier.classify("안녕하세요").intent, Intent::General);
    }

    #[test]
    fn test_purpose_keyword_beats_program() {
        let result = classifier().classify("디딤돌로 매매 가능할까");
        assert_eq!(result.intent, Intent::LoanPurchase);
        assert_eq!(result.slots.policy_mention.as_deref(), Some("디딤돌 대출"));
    }

    #[test]
    fn test_profile_purpose_is_last_resort() {
        let profile = Fields {
            purpose: Purpose::Purchase,
            ..Default::default()
        };
        let classifier = classifier();
        assert_eq!(
            classifier.classify_with_profile("월소득 500만", &profile).intent,
            Intent::LoanPurchase
        );
        // A glossary question still wins over the remembered purpose
        assert_eq!(
            classifier.classify_with_profile("LTV 뜻", &profile).intent,
            Intent::Glossary
        );
    }
}
