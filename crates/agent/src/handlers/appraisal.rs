//! Appraisal shortfall coaching

use housing_advisor_core::{Card, Confidence, Response};
use housing_advisor_text_processing::format_korean_amount;
use housing_advisor_tools::AppraisalGap;

use super::Handler;
use crate::context::RouteContext;

/// Strategy for an appraisal that came in under the requested loan amount.
///
/// Gated on a distress keyword plus an appraisal keyword; both amounts must be
/// stated in the message for the handler to answer.
pub struct AppraisalGapHandler;

impl Handler for AppraisalGapHandler {
    fn id(&self) -> &str {
        "appraisal_gap"
    }

    fn priority(&self) -> u32 {
        600
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        let vocabulary = ctx.vocabulary();
        ctx.mentions(&vocabulary.distress) && ctx.mentions(&vocabulary.appraisal)
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let requested = ctx.extractor.extract_requested_amount(ctx.message)?;
        let appraised = ctx.extractor.extract_appraised_amount(ctx.message)?;
        let gap = AppraisalGap::compute(requested, appraised)?;

        let amounts = vec![
            format!("신청액 {}", format_korean_amount(gap.requested)),
            format!("감정가 {}", format_korean_amount(gap.appraised)),
        ];

        if !gap.has_gap() {
            return Some(
                Response::builder(format!(
                    "걱정하지 않으셔도 됩니다. 감정가 {}이 신청액 {} 이상이라 감정가 때문에 한도가 줄지는 않습니다. 한도가 부족하다면 DSR이나 LTV 기준을 먼저 확인해 보세요.",
                    format_korean_amount(gap.appraised),
                    format_korean_amount(gap.requested)
                ))
                .card(Card::new("감정가 차이").subtitle("차이 없음").notes(amounts))
                .confidence(Confidence::High)
                .build(),
            );
        }

        let strategy = ctx.domain.appraisal.strategy_for_gap_bp(gap.gap_bp);
        tracing::debug!(
            gap_bp = gap.gap_bp,
            band = strategy.map(|s| s.label.as_str()),
            "Appraisal gap computed"
        );

        let mut content = format!(
            "감정가가 예상보다 낮게 나와 많이 당황스러우셨을 것 같아요. 신청액 {} 대비 감정가 {}으로 {}이 부족하고, 차이는 {:.1}%입니다.",
            format_korean_amount(gap.requested),
            format_korean_amount(gap.appraised),
            format_korean_amount(gap.shortfall),
            gap.gap_percent()
        );

        let mut notes = amounts;
        notes.push(format!("부족분 {}", format_korean_amount(gap.shortfall)));
        let mut card = Card::new("감정가 차이");
        let mut builder;
        match strategy {
            Some(strategy) => {
                content.push_str(&format!(" [{}] {}", strategy.label, strategy.content));
                card = card.subtitle(strategy.label.as_str());
                builder = Response::builder(content).checklist(strategy.checklist.iter().cloned());
            }
            None => {
                content.push_str(" 재감정 요청과 부족분 조달 방법을 함께 검토해 보세요.");
                builder = Response::builder(content);
            }
        }
        builder = builder.card(card.notes(notes)).confidence(Confidence::High);
        Some(builder.build())
    }
}
