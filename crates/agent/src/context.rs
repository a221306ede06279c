//! Per-message routing context
//!
//! Everything a handler may look at, computed once per message and borrowed by every
//! predicate in the cascade. Nothing in here is mutable.

use housing_advisor_config::{MasterDomainConfig, VocabularyConfig};
use housing_advisor_core::{Fields, LoanCalculator};
use housing_advisor_text_processing::{
    contains_amount, Classification, KnowledgeMatcher, NormalizedText, SlotExtractor,
};

pub struct RouteContext<'a> {
    /// Raw message as received
    pub message: &'a str,
    pub text: &'a NormalizedText,
    pub classification: &'a Classification,
    pub domain: &'a MasterDomainConfig,
    pub calculator: &'a dyn LoanCalculator,
    pub extractor: &'a SlotExtractor,
    pub knowledge: &'a KnowledgeMatcher,
    /// Canonical program names in order of appearance
    pub programs_mentioned: Vec<String>,
    /// Whether the message carries any amount expression
    pub has_amount: bool,
}

impl<'a> RouteContext<'a> {
    pub fn new(
        message: &'a str,
        text: &'a NormalizedText,
        classification: &'a Classification,
        domain: &'a MasterDomainConfig,
        calculator: &'a dyn LoanCalculator,
        extractor: &'a SlotExtractor,
        knowledge: &'a KnowledgeMatcher,
    ) -> Self {
        Self {
            message,
            text,
            classification,
            domain,
            calculator,
            extractor,
            knowledge,
            programs_mentioned: extractor.mentioned_programs(text),
            has_amount: contains_amount(&text.normalized),
        }
    }

    /// Profile merged with this message; what numeric answers are computed from
    pub fn fields(&self) -> &Fields {
        &self.classification.merged
    }

    /// Slots stated in this message alone
    pub fn message_slots(&self) -> &Fields {
        &self.classification.slots
    }

    pub fn vocabulary(&self) -> &VocabularyConfig {
        &self.domain.vocabulary
    }

    /// Message mentions at least one keyword of `keywords`
    pub fn mentions<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        self.text.contains_any(keywords)
    }
}
