//! Acquisition tax handlers

use housing_advisor_core::{Card, Confidence, Response};
use housing_advisor_text_processing::{format_korean_amount, format_won};
use housing_advisor_tools::{AcquisitionCost, FIRST_TIME_RELIEF_CAP, FIRST_TIME_RELIEF_PRICE_LIMIT};

use super::Handler;
use crate::context::RouteContext;

const ACQUISITION_TAX: &str = "취득세";

/// First-time-buyer acquisition tax relief.
///
/// Needs both "취득세" and a relief / first-time keyword; either alone is too broad.
pub struct AcquisitionTaxReliefHandler;

impl Handler for AcquisitionTaxReliefHandler {
    fn id(&self) -> &str {
        "acquisition_tax_relief"
    }

    fn priority(&self) -> u32 {
        300
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        ctx.text.contains(ACQUISITION_TAX) && ctx.mentions(&ctx.vocabulary().relief)
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let fields = ctx.fields();
        let not_first_time = fields.first_time_buyer == Some(false);

        let mut content = format!(
            "생애최초로 주택을 구입하면 취득세를 최대 {}까지 감면받을 수 있습니다. 주택가격 {} 이하이고 본인과 배우자 모두 주택을 소유한 적이 없어야 합니다.",
            format_korean_amount(FIRST_TIME_RELIEF_CAP),
            format_korean_amount(FIRST_TIME_RELIEF_PRICE_LIMIT)
        );
        if not_first_time {
            content.push_str(" 다만 주택을 보유한 적이 있다면 생애최초 감면 대상이 아닙니다.");
        }

        let mut builder;
        match fields.property_price {
            Some(price) => {
                let cost = AcquisitionCost::estimate(price, !not_first_time);
                if price > FIRST_TIME_RELIEF_PRICE_LIMIT {
                    content.push_str(&format!(
                        " 매매가 {}은 한도를 넘어 감면 없이 취득세 {}이 부과됩니다.",
                        format_korean_amount(price),
                        format_won(cost.acquisition_tax)
                    ));
                } else if cost.relief > 0 {
                    content.push_str(&format!(
                        " 매매가 {} 기준 취득세 {} 중 {}을 감면받아 지방교육세를 포함한 세금은 {}입니다.",
                        format_korean_amount(price),
                        format_won(cost.acquisition_tax),
                        format_won(cost.relief),
                        format_won(cost.taxes())
                    ));
                }
                builder = Response::builder(content)
                    .card(
                        Card::new("취득세 예상")
                            .subtitle(format!("매매가 {}", format_korean_amount(price)))
                            .notes(cost.breakdown()),
                    )
                    .confidence(Confidence::High);
            }
            None => {
                content.push_str(" 매매가를 알려주시면 감면 후 세액을 계산해 드립니다.");
                builder = Response::builder(content).confidence(Confidence::Medium);
            }
        }

        builder = builder.checklist([
            "잔금 후 60일 이내 취득세 신고하며 감면 신청",
            "취득일부터 3개월 이내 전입",
            "3년 이상 실거주 유지 (미충족 시 추징)",
            "세대원 전원의 주택 소유 이력 확인",
        ]);
        Some(builder.build())
    }
}

/// Purchase cost estimate: acquisition tax, education tax and brokerage fee
pub struct AcquisitionCostHandler;

impl Handler for AcquisitionCostHandler {
    fn id(&self) -> &str {
        "acquisition_cost"
    }

    fn priority(&self) -> u32 {
        550
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        ctx.fields().property_price.is_some() && ctx.mentions(&ctx.vocabulary().tax)
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let fields = ctx.fields();
        let price = fields.property_price?;
        let cost = AcquisitionCost::estimate(price, fields.first_time_buyer == Some(true));

        let mut content = format!(
            "매매가 {} 기준 예상 부대비용은 약 {}입니다. 취득세 {}(세율 {:.2}%), 지방교육세 {}, 중개보수 상한 {}을 더한 금액입니다.",
            format_korean_amount(price),
            format_won(cost.total()),
            format_won(cost.acquisition_tax),
            cost.tax_rate,
            format_won(cost.education_tax),
            format_won(cost.brokerage_fee)
        );
        if cost.relief > 0 {
            content.push_str(&format!(
                " 생애최초 감면 {}을 반영했습니다.",
                format_won(cost.relief)
            ));
        }

        Some(
            Response::builder(content)
                .card(
                    Card::new("부대비용 예상")
                        .subtitle(format!("합계 {}", format_won(cost.total())))
                        .notes(cost.breakdown()),
                )
                .checklist([
                    "법무사 등기 비용과 국민주택채권 매입 비용 별도 확인",
                    "중개보수는 상한 요율 안에서 협의 가능",
                    "잔금일에 취득세 납부 자금 준비",
                ])
                .confidence(Confidence::High)
                .build(),
        )
    }
}
