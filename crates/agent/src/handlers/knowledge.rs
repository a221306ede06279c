//! Fixed-answer knowledge handlers: glossary definitions and FAQs

use housing_advisor_core::{Confidence, Response};

use super::Handler;
use crate::context::RouteContext;

/// Term definitions ("DSR이 뭐야")
pub struct GlossaryHandler;

impl Handler for GlossaryHandler {
    fn id(&self) -> &str {
        "glossary"
    }

    fn priority(&self) -> u32 {
        100
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        ctx.knowledge.match_glossary(ctx.text).is_some()
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let entry = ctx.knowledge.match_glossary(ctx.text)?;
        Some(
            Response::builder(entry.definition.as_str())
                .confidence(Confidence::High)
                .build(),
        )
    }
}

/// Keyword-gated FAQ answers for messages without amounts
pub struct FaqHandler;

impl Handler for FaqHandler {
    fn id(&self) -> &str {
        "faq"
    }

    fn priority(&self) -> u32 {
        110
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        !ctx.has_amount && ctx.knowledge.match_faq(ctx.text).is_some()
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let faq = ctx.knowledge.match_faq(ctx.text)?;
        Some(
            Response::builder(faq.content.as_str())
                .checklist(faq.checklist.iter().cloned())
                .confidence(Confidence::High)
                .build(),
        )
    }
}
