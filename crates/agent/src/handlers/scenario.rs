//! Three-scenario loan answer

use housing_advisor_core::{
    percent_of, Card, Confidence, LoanScenario, ProgramPurpose, Region, Response, ScenarioKind,
};
use housing_advisor_text_processing::{format_korean_amount, format_won};
use housing_advisor_tools::{
    compare_repayment_types, find_matching_programs_for, generate_scenarios, ScenarioInput,
};

use super::Handler;
use crate::context::RouteContext;

/// Max-leverage, safe and policy-assisted structurings for a purchase
///
/// Fires when this message states a number and the merged profile knows the price plus
/// either income or a down payment. Without a down payment the max-LTV down payment is
/// assumed and the answer drops to medium confidence.
pub struct LoanScenarioHandler;

impl Handler for LoanScenarioHandler {
    fn id(&self) -> &str {
        "loan_scenarios"
    }

    fn priority(&self) -> u32 {
        200
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        let fields = ctx.fields();
        ctx.message_slots().has_numeric_slot()
            && fields.property_price.is_some()
            && (fields.income_monthly.is_some() || fields.effective_down_payment().is_some())
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let fields = ctx.fields();
        let params = ctx.calculator.params();
        let price = fields.property_price?;

        let (down_payment, assumed_down) = match fields.effective_down_payment() {
            Some(down) => (down, false),
            None => (price - percent_of(price, params.max_ltv_percent), true),
        };
        let input = ScenarioInput {
            property_price: price,
            down_payment,
            income_monthly: fields.income_monthly,
            term_years: fields.loan_period_years(),
            existing_monthly_debt: fields.monthly_debt_payment,
        };

        let scenarios = match generate_scenarios(ctx.calculator, &ctx.domain.programs, &input, fields)
        {
            Ok(scenarios) => scenarios,
            Err(e) => {
                tracing::warn!(error = %e, "Scenario input rejected");
                return None;
            }
        };
        let safe = scenarios.iter().find(|s| s.kind == ScenarioKind::Safe)?;

        let mut content = format!(
            "매매가 {}, 자기자본 {} 기준으로 {}년 만기 대출 구조 세 가지를 계산했습니다.",
            format_korean_amount(price),
            format_korean_amount(down_payment),
            input.term_years
        );
        if assumed_down {
            content.push_str(&format!(
                " 자기자본은 LTV {}% 한도에 맞춰 {}으로 가정했습니다.",
                params.max_ltv_percent,
                format_korean_amount(down_payment)
            ));
        }
        content.push_str(&format!(
            " 안전 상환 기준으로 {}을 빌리면 월 {}을 갚게 됩니다",
            format_korean_amount(safe.loan_amount),
            format_won(safe.monthly_payment)
        ));
        match safe.dsr {
            Some(dsr) => content.push_str(&format!(" (DSR {:.1}%).", dsr)),
            None => content.push('.'),
        }

        let matching = find_matching_programs_for(&ctx.domain.programs, ProgramPurpose::Purchase, fields);
        if !matching.is_empty() {
            let names: Vec<&str> = matching.iter().take(3).map(|p| p.name.as_str()).collect();
            content.push_str(&format!(
                " 현재 정보로 요건을 충족하는 정책대출은 {}입니다.",
                names.join(", ")
            ));
        }

        let repayment_notes = compare_repayment_types(
            ctx.calculator,
            safe.loan_amount,
            safe.interest_rate,
            input.term_years,
        )
        .into_iter()
        .map(|summary| {
            format!(
                "{} ({:.2}%): 첫 달 {} → 마지막 달 {}, 총이자 {}",
                summary.repayment_type.label(),
                summary.interest_rate,
                format_won(summary.first_payment),
                format_won(summary.last_payment),
                format_won(summary.total_interest)
            )
        })
        .collect::<Vec<_>>();
        let repayment_card = Card::new("상환 방식 비교")
            .subtitle(format!("안전 상환 {} 기준", format_korean_amount(safe.loan_amount)))
            .notes(repayment_notes);

        let mut checklist = vec![format!(
            "DSR {:.0}% 이내인지 은행 사전 한도 조회로 확인",
            params.dsr_limit_percent
        )];
        if let Some(program) = matching.first() {
            checklist.push(format!("{} 자격 서류 준비", program.name));
        }
        match fields.region {
            Region::Regulated => {
                checklist.push("규제지역은 LTV 한도가 낮아질 수 있어 지역별 한도 확인".to_string())
            }
            Region::Unknown => checklist.push("규제지역 여부 확인 (LTV 한도에 영향)".to_string()),
            Region::NonRegulated => {}
        }
        checklist.push("잔금일 1~2개월 전 대출 신청".to_string());

        let confidence = if !assumed_down
            && fields.income_monthly.is_some()
            && ctx.classification.missing.is_empty()
        {
            Confidence::High
        } else {
            Confidence::Medium
        };

        Some(
            Response::builder(content)
                .cards(scenarios.iter().map(scenario_card))
                .card(repayment_card)
                .checklist(checklist)
                .confidence(confidence)
                .build(),
        )
    }
}

fn scenario_card(scenario: &LoanScenario) -> Card {
    let mut notes = vec![scenario.description.clone()];
    if let Some(dsr) = scenario.dsr {
        notes.push(format!("DSR {:.1}%", dsr));
    }
    notes.extend(scenario.advantages.iter().map(|a| format!("장점: {}", a)));
    notes.extend(scenario.considerations.iter().map(|c| format!("유의: {}", c)));

    Card::new(scenario.title.as_str())
        .subtitle(format!(
            "대출 {} · 금리 {:.2}%",
            format_korean_amount(scenario.loan_amount),
            scenario.interest_rate
        ))
        .monthly(scenario.monthly_payment)
        .total_interest(scenario.total_interest)
        .notes(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::Fixture;
    use housing_advisor_core::{Fields, LoanCalculator};

    #[test]
    fn test_purchase_sentence_scenarios() {
        let fixture = Fixture::builtin();
        let response = fixture
            .with_context(
                "월소득500만원, 5억원 집 구입, 자기자본1억원",
                &Fields::default(),
                |ctx| {
                    assert!(LoanScenarioHandler.matches(ctx));
                    LoanScenarioHandler.generate(ctx)
                },
            )
            .unwrap();

        let cards = response.cards.as_ref().unwrap();
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].title, "최대 레버리지");
        assert!(cards[0].subtitle.as_ref().unwrap().contains("4억원"));
        assert_eq!(cards[1].title, "안전 상환");
        assert_eq!(
            cards[1].monthly,
            Some(fixture.calculator.amortized_payment(300_000_000, 4.2, 360))
        );
        assert_eq!(cards[3].notes.as_ref().map(Vec::len), Some(3));
        assert_eq!(response.confidence, Confidence::High);
        assert!(response.checklist_len() >= 2);
    }

    #[test]
    fn test_requires_number_in_message() {
        let fixture = Fixture::builtin();
        let profile = Fields {
            property_price: Some(500_000_000),
            down_payment: Some(100_000_000),
            ..Default::default()
        };
        fixture.with_context("어떻게 생각해?", &profile, |ctx| {
            assert!(!LoanScenarioHandler.matches(ctx));
        });
        fixture.with_context("월소득 400만", &profile, |ctx| {
            assert!(LoanScenarioHandler.matches(ctx));
        });
    }

    #[test]
    fn test_assumed_down_payment_is_medium() {
        let fixture = Fixture::builtin();
        let response = fixture
            .with_context("매매가 5억, 월소득 500만", &Fields::default(), |ctx| {
                LoanScenarioHandler.generate(ctx)
            })
            .unwrap();
        assert!(response.content.contains("가정"));
        assert!(response.content.contains("1억원"));
        assert_eq!(response.confidence, Confidence::Medium);
    }

    #[test]
    fn test_price_alone_does_not_match() {
        let fixture = Fixture::builtin();
        fixture.with_context("매매가 5억", &Fields::default(), |ctx| {
            assert!(!LoanScenarioHandler.matches(ctx));
        });
    }
}
