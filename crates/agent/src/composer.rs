//! Response composition
//!
//! Last step of routing: normalizes whatever the cascade produced and appends the
//! one-line missing-info prompt.

use housing_advisor_config::MasterDomainConfig;
use housing_advisor_core::{Confidence, Response};
use housing_advisor_text_processing::Classification;

use crate::handlers::terminal_fallback;

#[derive(Debug, Clone)]
pub struct ResponseComposer {
    append_missing_prompt: bool,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ResponseComposer {
    pub fn new(append_missing_prompt: bool) -> Self {
        Self {
            append_missing_prompt,
        }
    }

    /// Finalize `response`.
    ///
    /// Content is never empty and `cards`/`checklist` are either absent or non-empty.
    /// When the classifier reported missing slots and the answer is not high
    /// confidence, a single line asking for exactly those slots is appended.
    pub fn compose(
        &self,
        mut response: Response,
        classification: &Classification,
        domain: &MasterDomainConfig,
    ) -> Response {
        let trimmed = response.content.trim();
        if trimmed.is_empty() {
            tracing::warn!(handler = ?response.handler, "Handler produced empty content");
            response.content = terminal_fallback(domain).content;
        } else if trimmed.len() != response.content.len() {
            response.content = trimmed.to_string();
        }
        if response.cards.as_ref().is_some_and(Vec::is_empty) {
            response.cards = None;
        }
        if response.checklist.as_ref().is_some_and(Vec::is_empty) {
            response.checklist = None;
        }

        if self.append_missing_prompt
            && !classification.missing.is_empty()
            && response.confidence != Confidence::High
        {
            let prompt = missing_prompt(classification, domain);
            response.content.push('\n');
            response.content.push_str(&prompt);
        }
        response
    }
}

/// "추가로 알려주시면 더 정확해요: 매매가(예: 매매 5억), 월소득(예: 월소득 500만)"
fn missing_prompt(classification: &Classification, domain: &MasterDomainConfig) -> String {
    let items: Vec<String> = classification
        .missing
        .iter()
        .zip(&classification.missing_labels)
        .map(|(key, label)| match domain.slot_example(key) {
            Some(example) => format!("{}(예: {})", label, example),
            None => label.clone(),
        })
        .collect();
    format!("추가로 알려주시면 더 정확해요: {}", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_advisor_core::{Fields, Intent};

    fn classification(missing: &[&str], labels: &[&str]) -> Classification {
        Classification {
            intent: Intent::LoanPurchase,
            slots: Fields::default(),
            merged: Fields::default(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
            missing_labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn domain() -> MasterDomainConfig {
        MasterDomainConfig::builtin().unwrap()
    }

    #[test]
    fn test_appends_single_line_prompt() {
        let composer = ResponseComposer::default();
        let response = Response::builder("예상 계산입니다.")
            .confidence(Confidence::Medium)
            .build();
        let composed = composer.compose(
            response,
            &classification(&["down_payment", "income_monthly"], &["자기자본", "월소득"]),
            &domain(),
        );
        assert_eq!(
            composed.content,
            "예상 계산입니다.\n추가로 알려주시면 더 정확해요: 자기자본(예: 자기자본 1억), 월소득(예: 월소득 500만)"
        );
        assert_eq!(composed.content.lines().count(), 2);
    }

    #[test]
    fn test_high_confidence_skips_prompt() {
        let composer = ResponseComposer::default();
        let response = Response::builder("정의입니다.")
            .confidence(Confidence::High)
            .build();
        let composed = composer.compose(response, &classification(&["income_monthly"], &["월소득"]), &domain());
        assert_eq!(composed.content, "정의입니다.");
    }

    #[test]
    fn test_prompt_can_be_disabled() {
        let composer = ResponseComposer::new(false);
        let response = Response::builder("예상").build();
        let composed = composer.compose(response, &classification(&["income_monthly"], &["월소득"]), &domain());
        assert_eq!(composed.content, "예상");
    }

    #[test]
    fn test_empty_parts_are_normalized() {
        let composer = ResponseComposer::default();
        let mut response = Response::builder("x").build();
        response.content = "   ".to_string();
        response.cards = Some(Vec::new());
        response.checklist = Some(Vec::new());
        let composed = composer.compose(response, &classification(&[], &[]), &domain());
        assert!(!composed.content.trim().is_empty());
        assert!(composed.cards.is_none());
        assert!(composed.checklist.is_none());
    }
}
