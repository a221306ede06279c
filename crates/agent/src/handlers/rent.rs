//! Jeonse / monthly-rent conversion handler

use housing_advisor_core::{Card, Confidence, ProgramPurpose, Response};
use housing_advisor_text_processing::{format_korean_amount, format_won};
use housing_advisor_tools::{compare_jeonse, find_matching_programs_for, jeonse_equivalent_deposit};

use super::Handler;
use crate::context::RouteContext;

const LEASE_CHECKLIST: [&str; 3] = [
    "전입신고와 확정일자 받기",
    "HUG 전세보증금 반환보증 가입 가능 여부 확인",
    "등기부등본으로 근저당·선순위 채권 확인",
];

/// Converts a jeonse deposit to monthly rent (and back) at the configured rate
pub struct JeonseRentHandler;

impl Handler for JeonseRentHandler {
    fn id(&self) -> &str {
        "jeonse_rent"
    }

    fn priority(&self) -> u32 {
        700
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        ctx.mentions(&ctx.vocabulary().jeonse)
            && (ctx.extractor.extract_jeonse_deposit(ctx.message).is_some()
                || ctx.extractor.extract_monthly_rent(ctx.message).is_some())
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let deposit = ctx.extractor.extract_jeonse_deposit(ctx.message);
        let rent = ctx.extractor.extract_monthly_rent(ctx.message);
        let params = ctx.calculator.params();

        let mut cards = Vec::new();
        let mut content = match (deposit, rent) {
            (Some(deposit), rent) => {
                let comparison = compare_jeonse(ctx.calculator, deposit, rent);
                let mut content = match (comparison.quoted_rent, comparison.quoted_jeonse_equivalent) {
                    (Some(quoted), Some(equivalent)) => format!(
                        "보증금 {}에 월세 {}은 전월세 전환율 {:.1}% 기준 전세 약 {}에 해당합니다.",
                        format_korean_amount(deposit),
                        format_won(quoted),
                        params.jeonse_conversion_rate,
                        format_korean_amount(equivalent)
                    ),
                    _ => format!(
                        "전세 보증금 {}은 전월세 전환율 {:.1}% 기준 월세 약 {}에 해당합니다.",
                        format_korean_amount(deposit),
                        params.jeonse_conversion_rate,
                        format_won(comparison.monthly_equivalent)
                    ),
                };
                content.push_str(&format!(
                    " 전세대출로 보증금의 {}%인 {}을 연 {:.1}%에 빌리면 월 이자는 약 {}입니다.",
                    params.jeonse_loan_ltv_percent,
                    format_korean_amount(comparison.loan_amount),
                    comparison.loan_rate,
                    format_won(comparison.loan_monthly_interest)
                ));

                cards.push(
                    Card::new("월세 환산")
                        .subtitle(format!("보증금 {}", format_korean_amount(deposit)))
                        .monthly(comparison.monthly_equivalent)
                        .notes([format!("전환율 {:.1}%", params.jeonse_conversion_rate)]),
                );
                cards.push(
                    Card::new("전세대출 이용")
                        .subtitle(format!(
                            "대출 {} · 금리 {:.1}%",
                            format_korean_amount(comparison.loan_amount),
                            comparison.loan_rate
                        ))
                        .monthly(comparison.loan_monthly_interest)
                        .notes([format!(
                            "자기자금 {}",
                            format_korean_amount(deposit - comparison.loan_amount)
                        )]),
                );
                content
            }
            (None, Some(rent)) => {
                let equivalent = jeonse_equivalent_deposit(0, rent, params.jeonse_conversion_rate)?;
                cards.push(
                    Card::new("전세 환산")
                        .subtitle(format!("월세 {}", format_won(rent)))
                        .notes([format!("전환율 {:.1}%", params.jeonse_conversion_rate)]),
                );
                format!(
                    "월세 {}은 전월세 전환율 {:.1}% 기준 전세 보증금 약 {}에 해당합니다.",
                    format_won(rent),
                    params.jeonse_conversion_rate,
                    format_korean_amount(equivalent)
                )
            }
            (None, None) => return None,
        };

        let programs = find_matching_programs_for(&ctx.domain.programs, ProgramPurpose::Jeonse, ctx.fields());
        if !programs.is_empty() {
            let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
            content.push_str(&format!(
                " 요건이 맞으면 {}으로 더 낮은 금리를 이용할 수 있습니다.",
                names.join(", ")
            ));
        }

        Some(
            Response::builder(content)
                .cards(cards)
                .checklist(LEASE_CHECKLIST)
                .confidence(Confidence::High)
                .build(),
        )
    }
}
