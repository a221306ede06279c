//! Policy-program handlers: income verification period, program comparison and the
//! newlywed program map

use housing_advisor_core::{Card, Confidence, Fields, MaritalStatus, PolicyProgram, Response};
use housing_advisor_text_processing::format_korean_amount;
use housing_advisor_tools::evaluate_programs;

use super::Handler;
use crate::context::RouteContext;

fn program_card(program: &PolicyProgram) -> Card {
    Card::new(program.name.as_str())
        .subtitle(format!(
            "최대 {} · 금리 {:.2}%",
            format_korean_amount(program.max_amount),
            program.interest_rate
        ))
        .notes(program.conditions.iter().cloned())
}

/// Whether any fact an eligibility rule looks at is known
fn knows_eligibility_facts(fields: &Fields) -> bool {
    fields.income_monthly.is_some()
        || fields.property_price.is_some()
        || fields.credit_tier.is_some()
        || fields.first_time_buyer.is_some()
        || fields.has_newborn.is_some()
        || fields.has_children.is_some()
        || fields.marital_status != MaritalStatus::Unknown
}

fn mentioned<'a>(ctx: &'a RouteContext<'_>) -> Vec<&'a PolicyProgram> {
    ctx.programs_mentioned
        .iter()
        .filter_map(|name| ctx.domain.find_program(name))
        .collect()
}

/// Which income period a named program verifies
pub struct PolicyIncomePeriodHandler;

impl Handler for PolicyIncomePeriodHandler {
    fn id(&self) -> &str {
        "policy_income_period"
    }

    fn priority(&self) -> u32 {
        400
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        !ctx.programs_mentioned.is_empty() && ctx.mentions(&ctx.vocabulary().timing)
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let programs: Vec<(&PolicyProgram, &str)> = mentioned(ctx)
            .into_iter()
            .filter_map(|p| p.income_verification.as_deref().map(|text| (p, text)))
            .collect();
        if programs.is_empty() {
            return None;
        }

        let content = programs
            .iter()
            .map(|(program, text)| format!("{}: {}", program.name, text))
            .collect::<Vec<_>>()
            .join("\n");

        Some(
            Response::builder(content)
                .cards(programs.iter().map(|(program, _)| program_card(program)))
                .checklist([
                    "직전 연도 원천징수영수증 또는 소득금액증명원",
                    "재직 1년 미만이면 급여명세서와 재직증명서",
                    "맞벌이는 배우자 소득 서류도 함께 준비",
                ])
                .confidence(Confidence::High)
                .build(),
        )
    }
}

/// Side-by-side comparison of two or more named programs
pub struct ProgramComparisonHandler;

impl Handler for ProgramComparisonHandler {
    fn id(&self) -> &str {
        "program_comparison"
    }

    fn priority(&self) -> u32 {
        500
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        ctx.programs_mentioned.len() >= 2 && ctx.mentions(&ctx.vocabulary().comparison)
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let programs = mentioned(ctx);
        if programs.len() < 2 {
            return None;
        }

        let lowest_rate = programs
            .iter()
            .min_by(|a, b| a.interest_rate.total_cmp(&b.interest_rate))?;
        let highest_cap = programs.iter().max_by_key(|p| p.max_amount)?;

        let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
        let mut content = format!(
            "{}를 비교하면 금리는 {}({:.2}%)가 가장 낮고, 한도는 {}(최대 {})가 가장 큽니다.",
            names.join(" vs "),
            lowest_rate.name,
            lowest_rate.interest_rate,
            highest_cap.name,
            format_korean_amount(highest_cap.max_amount)
        );

        let fields = ctx.fields();
        let mut cards = Vec::with_capacity(programs.len());
        if !knows_eligibility_facts(fields) {
            cards.extend(programs.iter().map(|p| program_card(*p)));
        } else {
            let mut eligible = Vec::new();
            for program in &programs {
                let unmet = program.eligibility.unmet_conditions(fields);
                let verdict = if unmet.is_empty() {
                    eligible.push(program.name.as_str());
                    "현재 정보로 자격 충족".to_string()
                } else {
                    format!("확인 필요: {}", unmet.join(", "))
                };
                let mut notes = program.conditions.clone();
                notes.push(verdict);
                cards.push(program_card(program).notes(notes));
            }
            if eligible.is_empty() {
                content.push_str(" 현재 정보로는 모두 추가 확인이 필요합니다.");
            } else {
                content.push_str(&format!(
                    " 현재 정보로 자격이 되는 상품은 {}입니다.",
                    eligible.join(", ")
                ));
            }
        }

        Some(
            Response::builder(content)
                .cards(cards)
                .checklist([
                    "정책대출은 하나만 선택 가능",
                    "소득·주택가격 요건 먼저 확인",
                    "우대금리 항목 비교",
                ])
                .confidence(Confidence::High)
                .build(),
        )
    }
}

/// Programs available to newlyweds and couples planning to marry
pub struct NewlywedProgramsHandler;

impl Handler for NewlywedProgramsHandler {
    fn id(&self) -> &str {
        "newlywed_programs"
    }

    fn priority(&self) -> u32 {
        530
    }

    fn matches(&self, ctx: &RouteContext<'_>) -> bool {
        let vocabulary = ctx.vocabulary();
        ctx.mentions(&vocabulary.newlywed) && ctx.mentions(&vocabulary.loan)
    }

    fn generate(&self, ctx: &RouteContext<'_>) -> Option<Response> {
        let mut profile = ctx.fields().clone();
        if profile.marital_status == MaritalStatus::Unknown {
            profile.marital_status = MaritalStatus::Married;
        }

        let reports = evaluate_programs(&ctx.domain.programs, &profile);
        let targets_newlyweds = |program: &PolicyProgram| {
            program.eligibility.marital_statuses.iter().any(|status| {
                matches!(status, MaritalStatus::Married | MaritalStatus::Planning)
            })
        };

        let dedicated: Vec<&str> = ctx
            .domain
            .programs
            .iter()
            .filter(|p| targets_newlyweds(*p))
            .map(|p| p.name.as_str())
            .collect();

        let mut cards = Vec::new();
        let mut eligible = Vec::new();
        for report in &reports {
            let Some(program) = ctx.domain.find_program(&report.program) else {
                continue;
            };
            if report.eligible {
                eligible.push(program.name.as_str());
                cards.push(program_card(program));
            } else if targets_newlyweds(program) {
                let mut notes = program.conditions.clone();
                notes.push(format!("확인 필요: {}", report.unmet.join(", ")));
                cards.push(program_card(program).notes(notes));
            }
        }

        let mut content = String::from("신혼부부(결혼 예정 포함)가 이용할 수 있는 정책대출을 정리했습니다.");
        if !dedicated.is_empty() {
            content.push_str(&format!(" 신혼 전용 상품은 {}입니다.", dedicated.join(", ")));
        }
        if !eligible.is_empty() {
            content.push_str(&format!(
                " 현재 정보로 요건을 충족하는 상품은 {}입니다.",
                eligible.join(", ")
            ));
        }
        let confidence = if profile.income_monthly.is_some() {
            Confidence::High
        } else {
            content.push_str(" 부부합산 소득을 알려주시면 자격을 더 정확히 판단해 드립니다.");
            Confidence::Medium
        };

        Some(
            Response::builder(content)
                .cards(cards)
                .checklist([
                    "혼인관계증명서 (결혼 예정이면 예식장 계약서나 청첩장)",
                    "부부합산 소득 증빙",
                    "세대원 전원 무주택 확인",
                ])
                .confidence(confidence)
                .build(),
        )
    }
}
