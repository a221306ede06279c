//! Knowledge / glossary matching
//!
//! Recognizes purely informational questions that have a fixed answer: term definitions
//! ("DSR이 뭐야") and FAQ entries gated by keyword-group conjunctions.

use std::sync::Arc;

use housing_advisor_config::{FaqEntry, GlossaryEntry, MasterDomainConfig};

use crate::amount::contains_amount;
use crate::korean::{compact, NormalizedText};

#[derive(Debug, Clone)]
pub struct KnowledgeMatcher {
    config: Arc<MasterDomainConfig>,
}

impl KnowledgeMatcher {
    pub fn new(config: Arc<MasterDomainConfig>) -> Self {
        Self { config }
    }

    /// True when the message asks what something means
    pub fn is_definition_question(&self, text: &NormalizedText) -> bool {
        text.contains_any(&self.config.knowledge.definition_markers)
    }

    /// Glossary entry for a definition question.
    ///
    /// The longest matching surface form wins, so "스트레스 DSR" is not answered as "DSR".
    pub fn match_glossary(&self, text: &NormalizedText) -> Option<&GlossaryEntry> {
        if !self.is_definition_question(text) {
            return None;
        }

        self.config
            .knowledge
            .glossary
            .iter()
            .filter_map(|entry| {
                entry
                    .names()
                    .filter(|name| text.contains(name))
                    .map(|name| compact(name).chars().count())
                    .max()
                    .map(|len| (len, entry))
            })
            // max_by_key keeps the last maximum; reverse so the first configured entry wins ties
            .rev()
            .max_by_key(|(len, _)| *len)
            .map(|(_, entry)| entry)
    }

    /// First FAQ whose keyword groups all match, for messages without amounts
    pub fn match_faq(&self, text: &NormalizedText) -> Option<&FaqEntry> {
        if contains_amount(&text.normalized) {
            return None;
        }
        self.config
            .knowledge
            .faqs
            .iter()
            .find(|faq| text.matches_all_groups(&faq.all_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> KnowledgeMatcher {
        KnowledgeMatcher::new(Arc::new(MasterDomainConfig::builtin().unwrap()))
    }

    #[test]
    fn test_glossary_requires_marker() {
        let matcher = matcher();
        let entry = matcher.match_glossary(&NormalizedText::new("DSR이 뭐야")).unwrap();
        assert_eq!(entry.term, "DSR");
        assert!(matcher
            .match_glossary(&NormalizedText::new("DSR 40% 넘으면 어떻게 돼"))
            .is_none());
    }

    #[test]
    fn test_glossary_alias_and_case() {
        let matcher = matcher();
        let entry = matcher
            .match_glossary(&NormalizedText::new("ltv 뜻 알려줘"))
            .unwrap();
        assert_eq!(entry.term, "LTV");

        let entry = matcher
            .match_glossary(&NormalizedText::new("채권최고액이 뭔가요"))
            .unwrap();
        assert_eq!(entry.term, "근저당");
    }

    #[test]
    fn test_glossary_longest_term_wins() {
        let matcher = matcher();
        let entry = matcher
            .match_glossary(&NormalizedText::new("스트레스 DSR이 뭐예요?"))
            .unwrap();
        assert_eq!(entry.term, "스트레스 DSR");
    }

    #[test]
    fn test_faq_matches_all_groups() {
        let matcher = matcher();
        let faq = matcher
            .match_faq(&NormalizedText::new("대출 받을 때 서류 뭐 챙겨야 해?"))
            .unwrap();
        assert_eq!(faq.id, "loan_documents");

        assert!(matcher.match_faq(&NormalizedText::new("서류 준비")).is_none());
    }

    #[test]
    fn test_faq_skipped_when_amount_present() {
        assert!(matcher()
            .match_faq(&NormalizedText::new("5억 대출 서류 준비물"))
            .is_none());
    }
}
