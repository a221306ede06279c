//! Config-driven topic answers

use housing_advisor_config::TopicRule;
use housing_advisor_core::{Confidence, Response};

use super::Handler;
use crate::context::RouteContext;

/// Fixed answer for one [`TopicRule`]; fires when every keyword group is hit
pub struct TopicHandler {
    rule: TopicRule,
}

impl TopicHandler {
    pub fn new(rule: TopicRule) -> Self {
        Self { rule }
    }
}

impl Handler for TopicHandler {
    fn id(&self) -> &str {
        &self.rule.id
    }

    fn priority(&self) -> u32 {
        self.rule.priority
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        ctx.text.matches_all_groups(&self.rule.all_of)
    }

    fn generate(&self, _ctx: &RouteContext<'_>) -> Option<Response> {
        Some(
            Response::builder(self.rule.content.as_str())
                .checklist(self.rule.checklist.iter().cloned())
                .confidence(Confidence::High)
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::Fixture;
    use housing_advisor_core::Fields;

    fn handler(fixture: &Fixture, id: &str) -> TopicHandler {
        let rule = fixture
            .domain
            .topics
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .unwrap();
        TopicHandler::new(rule)
    }

    #[test]
    fn test_model_house_visit() {
        let fixture = Fixture::builtin();
        let topic = handler(&fixture, "model_house_visit");
        assert_eq!(topic.priority(), 510);

        let response = fixture
            .with_context("모델하우스 방문할 때 뭐 챙겨?", &Fields::default(), |ctx| {
                assert!(topic.matches(ctx));
                topic.generate(ctx)
            })
            .unwrap();
        assert!(response.content.contains("중도금"));
        assert_eq!(response.checklist_len(), 4);
        assert_eq!(response.confidence, Confidence::High);
    }

    #[test]
    fn test_every_group_must_hit() {
        let fixture = Fixture::builtin();
        let topic = handler(&fixture, "model_house_visit");
        fixture.with_context("모델하우스 분양가 비싸다", &Fields::default(), |ctx| {
            assert!(!topic.matches(ctx));
        });

        let overlap = handler(&fixture, "benefit_overlap");
        fixture.with_context("취득세 감면이랑 대출 특례 같이 받을 수 있어?", &Fields::default(), |ctx| {
            assert!(overlap.matches(ctx));
        });
    }
}
