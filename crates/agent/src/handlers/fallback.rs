//! Generic domain fallback and the terminal fallback

use housing_advisor_config::MasterDomainConfig;
use housing_advisor_core::{percent_of, Card, Confidence, Fields, LoanCalculator, Response};
use housing_advisor_text_processing::{format_korean_amount, format_won};

use super::Handler;
use crate::context::RouteContext;

/// Handler id reported by [`terminal_fallback`]; no registered handler may use it
pub const TERMINAL_FALLBACK_ID: &str = "fallback";

/// Last registered handler.
///
/// With a known amount it estimates from assumptions (configured illustrative rate,
/// stated or default term) instead of asking again; otherwise it offers the example
/// inputs from the domain config.
pub struct DomainFallbackHandler;

impl Handler for DomainFallbackHandler {
    fn id(&self) -> &str {
        "domain_fallback"
    }

    fn priority(&self) -> u32 {
        800
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        ctx.mentions(&ctx.vocabulary().in_domain) || ctx.has_amount || !ctx.fields().is_empty()
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let estimate = estimate(ctx.calculator, ctx.fields());
        Some(estimate.unwrap_or_else(|| examples_response(ctx.domain)))
    }
}

/// Assumption-based estimate from whichever money slot is known, price first
fn estimate(calculator: &dyn LoanCalculator, fields: &Fields) -> Option<Response> {
    let params = calculator.params();
    let rate = calculator.illustrative_rate();
    let years = fields.loan_period_years();
    let months = years * 12;
    let assumptions = format!("연 {:.1}%, {}년 원리금균등 상환", rate, years);

    let (content, card) = if let Some(price) = fields.property_price {
        let max_loan = percent_of(price, params.max_ltv_percent);
        let loan = match fields.effective_down_payment() {
            Some(down) => max_loan.min(price.saturating_sub(down)).max(0),
            None => max_loan,
        };
        let monthly = calculator.amortized_payment(loan, rate, months);
        let mut content = format!(
            "매매가 {}이면 LTV {}% 기준 대출은 최대 {} 정도이고, {}을 가정하면 월 상환액은 약 {}입니다.",
            format_korean_amount(price),
            params.max_ltv_percent,
            format_korean_amount(loan),
            assumptions,
            format_won(monthly)
        );
        if let Some(dsr) = fields
            .income_monthly
            .and_then(|income| calculator.dsr_percent(monthly, income))
        {
            content.push_str(&format!(" 월소득 대비 DSR은 {:.1}%입니다.", dsr));
        }
        let card = Card::new("예상 대출")
            .subtitle(format!("대출 {} · 금리 {:.1}%", format_korean_amount(loan), rate))
            .monthly(monthly)
            .total_interest(calculator.total_interest(loan, rate, months));
        (content, card)
    } else if let Some(income) = fields.income_monthly {
        let budget = (income as f64 * params.dsr_limit_percent / 100.0).round() as i64
            - fields.monthly_debt_payment.unwrap_or(0);
        if budget <= 0 {
            return Some(
                Response::builder(format!(
                    "월소득 {} 기준으로는 기존 대출 상환액이 이미 DSR {:.0}% 한도를 채우고 있어 추가 대출 여력이 거의 없습니다. 기존 대출 일부 상환이나 대환을 먼저 검토해 보세요.",
                    format_won(income),
                    params.dsr_limit_percent
                ))
                .confidence(Confidence::Medium)
                .build(),
            );
        }
        let principal = calculator.max_principal_for_payment(budget, rate, months);
        let content = format!(
            "월소득 {}이면 DSR {:.0}% 기준 월 {}까지 상환할 수 있고, {}을 가정하면 대출 가능 금액은 약 {}입니다.",
            format_won(income),
            params.dsr_limit_percent,
            format_won(budget),
            assumptions,
            format_korean_amount(principal)
        );
        let card = Card::new("대출 가능 금액")
            .subtitle(format!("대출 {} · 금리 {:.1}%", format_korean_amount(principal), rate))
            .monthly(budget);
        (content, card)
    } else if let Some(down) = fields.effective_down_payment() {
        if params.max_ltv_percent >= 100 {
            return None;
        }
        let price = down.saturating_mul(100) / (100 - params.max_ltv_percent) as i64;
        let loan = price - down;
        let monthly = calculator.amortized_payment(loan, rate, months);
        let content = format!(
            "자기자본 {}이면 LTV {}%를 채워 약 {} 주택까지 볼 수 있고, 이때 대출 {}은 {}을 가정하면 월 약 {}을 갚게 됩니다.",
            format_korean_amount(down),
            params.max_ltv_percent,
            format_korean_amount(price),
            format_korean_amount(loan),
            assumptions,
            format_won(monthly)
        );
        let card = Card::new("구입 가능 주택가격")
            .subtitle(format!("주택가격 {}", format_korean_amount(price)))
            .monthly(monthly)
            .notes([format!("대출 {}", format_korean_amount(loan))]);
        (content, card)
    } else {
        return None;
    };

    Some(
        Response::builder(format!(
            "{} 실제 한도와 금리는 소득·신용도와 은행 심사에 따라 달라집니다.",
            content
        ))
        .card(card)
        .checklist([
            "은행 사전 한도 조회로 실제 금리 확인",
            "정책대출 자격 여부 확인",
        ])
        .confidence(Confidence::Medium)
        .build(),
    )
}

fn examples_response(domain: &MasterDomainConfig) -> Response {
    let mut content = String::from(
        "상황을 숫자로 알려주시면 바로 계산해 드릴게요. 이렇게 물어보시면 됩니다:",
    );
    for example in &domain.example_inputs {
        content.push_str(&format!("\n- {}", example));
    }
    Response::builder(content)
        .checklist(domain.example_inputs.iter().cloned())
        .confidence(Confidence::Medium)
        .build()
}

/// Answer used when no registered handler produced a response
pub fn terminal_fallback(domain: &MasterDomainConfig) -> Response {
    let mut content = format!(
        "{}에서는 주택 구입 대출, 전세·월세, 취득세, 정책대출 자격에 대해 답변드릴 수 있어요.",
        domain.display_name
    );
    if let Some(example) = domain.example_inputs.first() {
        content.push_str(&format!(" 예를 들어 \"{}\"처럼 물어봐 주세요.", example));
    }
    Response::builder(content)
        .confidence(Confidence::Low)
        .handler(TERMINAL_FALLBACK_ID)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::Fixture;

    #[test]
    fn test_bare_amount_offers_examples() {
        let fixture = Fixture::builtin();
        let response = fixture
            .with_context("5억", &Fields::default(), |ctx| {
                assert!(DomainFallbackHandler.matches(ctx));
                DomainFallbackHandler.generate(ctx)
            })
            .unwrap();
        assert_eq!(
            response.checklist.as_deref(),
            Some(fixture.domain.example_inputs.as_slice())
        );
        assert_eq!(response.confidence, Confidence::Medium);
        assert!(response.cards.is_none());
    }

    #[test]
    fn test_known_price_gives_estimate() {
        let fixture = Fixture::builtin();
        let profile = Fields {
            property_price: Some(500_000_000),
            ..Default::default()
        };
        let response = fixture
            .with_context("어떻게 하면 좋을까요", &profile, |ctx| {
                assert!(DomainFallbackHandler.matches(ctx));
                DomainFallbackHandler.generate(ctx)
            })
            .unwrap();
        let card = &response.cards.as_ref().unwrap()[0];
        assert_eq!(
            card.monthly,
            Some(fixture.calculator.amortized_payment(400_000_000, 4.5, 360))
        );
        assert!(response.content.contains("4억원"));
        assert_eq!(response.confidence, Confidence::Medium);
    }

    #[test]
    fn test_income_only_estimate() {
        let fixture = Fixture::builtin();
        let profile = Fields {
            income_monthly: Some(5_000_000),
            ..Default::default()
        };
        let response = fixture
            .with_context("얼마나 빌릴 수 있어", &profile, |ctx| DomainFallbackHandler.generate(ctx))
            .unwrap();
        // 40% of 500만
        assert!(response.content.contains("₩2,000,000"));
        assert_eq!(response.card_count(), 1);
    }

    #[test]
    fn test_cash_only_estimate() {
        let fixture = Fixture::builtin();
        let profile = Fields {
            cash_on_hand: Some(100_000_000),
            ..Default::default()
        };
        let response = fixture
            .with_context("집 살 수 있을까", &profile, |ctx| DomainFallbackHandler.generate(ctx))
            .unwrap();
        // 1억 covers the 20% not financed at 80% LTV
        assert!(response.content.contains("약 5억원 주택"));
    }

    #[test]
    fn test_off_topic_does_not_match() {
        let fixture = Fixture::builtin();
        fixture.with_context("오늘 날씨 어때?", &Fields::default(), |ctx| {
            assert!(!DomainFallbackHandler.matches(ctx));
        });
    }

    #[test]
    fn test_terminal_fallback() {
        let fixture = Fixture::builtin();
        let response = terminal_fallback(&fixture.domain);
        assert!(!response.content.is_empty());
        assert_eq!(response.confidence, Confidence::Low);
        assert_eq!(response.handler.as_deref(), Some(TERMINAL_FALLBACK_ID));
    }
}
