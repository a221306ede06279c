//! Three-scenario loan generation
//!
//! Every purchase query gets the same three structurings: max-leverage, safe, and
//! policy-assisted. Percentages and rates come from `CalculatorParams`; the policy
//! scenario draws from the purchase programs of the catalog.

use housing_advisor_core::{
    is_valid_amount, percent_of, CalculatorError, Fields, LoanCalculator, LoanScenario,
    PolicyProgram, ProgramPurpose, ScenarioKind, MAX_AMOUNT, MAX_LOAN_PERIOD_YEARS,
};

/// Numbers a scenario set is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioInput {
    pub property_price: i64,
    pub down_payment: i64,
    /// Unknown income drops the safe scenario's income cap and leaves DSR absent
    pub income_monthly: Option<i64>,
    pub term_years: u32,
    /// Monthly payment on loans the user already carries
    pub existing_monthly_debt: Option<i64>,
}

impl ScenarioInput {
    /// Build from known fields; `None` without a property price or a down payment
    /// (cash on hand counts as the down payment).
    pub fn from_fields(fields: &Fields) -> Option<Self> {
        Some(Self {
            property_price: fields.property_price?,
            down_payment: fields.effective_down_payment()?,
            income_monthly: fields.income_monthly,
            term_years: fields.loan_period_years(),
            existing_monthly_debt: fields.monthly_debt_payment,
        })
    }

    pub fn months(&self) -> u32 {
        self.term_years * 12
    }

    /// Amount the buyer has to finance
    pub fn shortfall(&self) -> i64 {
        (self.property_price - self.down_payment).max(0)
    }

    fn validate(&self) -> Result<(), CalculatorError> {
        if self.property_price <= 0 {
            return Err(CalculatorError::invalid(
                "property_price",
                "must be positive",
            ));
        }
        let amounts = [
            ("property_price", Some(self.property_price)),
            ("down_payment", Some(self.down_payment)),
            ("income_monthly", self.income_monthly),
            ("existing_monthly_debt", self.existing_monthly_debt),
        ];
        for (param, amount) in amounts {
            if let Some(won) = amount.filter(|won| !is_valid_amount(*won)) {
                return Err(CalculatorError::invalid(
                    param,
                    format!("{} is outside 0..={}", won, MAX_AMOUNT),
                ));
            }
        }
        if self.term_years == 0 || self.term_years > MAX_LOAN_PERIOD_YEARS {
            return Err(CalculatorError::invalid(
                "term_years",
                format!(
                    "must be within 1..={}, got {}",
                    MAX_LOAN_PERIOD_YEARS, self.term_years
                ),
            ));
        }
        Ok(())
    }
}

/// Purchase program the policy scenario uses.
///
/// First program (ascending priority) whose cap covers the max-leverage loan, else the
/// first program.
pub fn select_policy_program<'a>(
    programs: &'a [PolicyProgram],
    max_leverage_loan: i64,
) -> Option<&'a PolicyProgram> {
    let mut purchase: Vec<&PolicyProgram> = programs
        .iter()
        .filter(|p| p.purpose == ProgramPurpose::Purchase)
        .collect();
    purchase.sort_by_key(|p| p.priority);

    purchase
        .iter()
        .find(|p| p.max_amount >= max_leverage_loan)
        .or_else(|| purchase.first())
        .copied()
}

/// Generate the max-leverage, safe and policy-assisted scenarios, in that order.
///
/// `profile` only feeds the eligibility notes of the policy scenario.
pub fn generate_scenarios(
    calculator: &dyn LoanCalculator,
    programs: &[PolicyProgram],
    input: &ScenarioInput,
    profile: &Fields,
) -> Result<Vec<LoanScenario>, CalculatorError> {
    input.validate()?;
    let params = calculator.params();
    let price = input.property_price;
    let shortfall = input.shortfall();

    let max_leverage_loan = percent_of(price, params.max_ltv_percent).min(shortfall);

    let mut safe_loan = percent_of(price, params.safe_ltv_percent).min(shortfall);
    if let Some(income) = input.income_monthly {
        safe_loan = safe_loan.min(
            income
                .saturating_mul(12)
                .saturating_mul(params.safe_income_years as i64),
        );
    }

    let program = select_policy_program(programs, max_leverage_loan)
        .ok_or_else(|| CalculatorError::CatalogMissing("purchase program".to_string()))?;
    let policy_loan = program
        .max_amount
        .min(percent_of(price, params.max_ltv_percent))
        .min(shortfall);

    let mut max_leverage = build_scenario(
        calculator,
        input,
        ScenarioKind::MaxLeverage,
        max_leverage_loan,
        calculator.leverage_rate(),
    );
    max_leverage.advantages = vec![
        "구입 가능한 집의 범위가 가장 넓습니다".to_string(),
        "보유 현금을 비상금으로 남길 수 있습니다".to_string(),
    ];
    max_leverage.considerations.push(format!(
        "가산금리 {:.1}%p가 붙어 이자 부담이 가장 큽니다",
        params.leverage_surcharge
    ));

    let mut safe = build_scenario(
        calculator,
        input,
        ScenarioKind::Safe,
        safe_loan,
        calculator.base_rate(),
    );
    safe.advantages = vec![
        "금리 변동에도 버틸 수 있는 상환 수준입니다".to_string(),
        format!(
            "LTV {}%, 연소득 {}배 이내로 제한한 금액입니다",
            params.safe_ltv_percent, params.safe_income_years
        ),
    ];
    if safe_loan < shortfall {
        safe.considerations.push(format!(
            "부족한 자금 {}원을 추가로 마련해야 합니다",
            group_thousands(shortfall - safe_loan)
        ));
    }

    let mut policy = build_scenario(
        calculator,
        input,
        ScenarioKind::PolicyAssisted,
        policy_loan,
        program.interest_rate,
    );
    policy.support_program = Some(program.name.clone());
    policy.description = format!("{} · {}", program.name, policy.description);
    policy.advantages = vec![
        format!("정책 금리 {:.2}%로 시중보다 낮습니다", program.interest_rate),
        format!("최대 {}원까지 지원됩니다", group_thousands(program.max_amount)),
    ];
    if policy_loan < shortfall {
        policy.considerations.push(format!(
            "한도가 부족해 {}원은 다른 대출이나 자금으로 채워야 합니다",
            group_thousands(shortfall - policy_loan)
        ));
    }
    let unmet = program.eligibility.unmet_conditions(profile);
    if !unmet.is_empty() {
        policy
            .considerations
            .push(format!("자격 확인 필요: {}", unmet.join(", ")));
    }
    policy.considerations.extend(program.conditions.iter().cloned());

    let scenarios = vec![max_leverage, safe, policy];
    tracing::debug!(
        price,
        shortfall,
        max_leverage_loan,
        safe_loan,
        policy_loan,
        program = %program.name,
        "Generated loan scenarios"
    );
    Ok(scenarios)
}

fn build_scenario(
    calculator: &dyn LoanCalculator,
    input: &ScenarioInput,
    kind: ScenarioKind,
    loan_amount: i64,
    rate: f64,
) -> LoanScenario {
    let months = input.months();
    let monthly_payment = calculator.amortized_payment(loan_amount, rate, months);
    let total_interest = calculator.total_interest(loan_amount, rate, months);
    let ltv = calculator
        .ltv_percent(loan_amount, input.property_price)
        .unwrap_or(0.0);
    let dsr = input
        .income_monthly
        .and_then(|income| calculator.dsr_percent(monthly_payment, income));

    let mut considerations = Vec::new();
    let limit = calculator.dsr_limit_percent();
    if let Some(dsr) = dsr {
        if dsr > limit {
            considerations.push(format!(
                "DSR {:.1}%로 규제 한도 {:.0}%를 넘어 실제 한도는 더 낮을 수 있습니다",
                dsr, limit
            ));
        }
    }
    if let (Some(existing), Some(income)) = (input.existing_monthly_debt, input.income_monthly) {
        if let Some(total) = calculator.dsr_percent(monthly_payment + existing, income) {
            let verdict = if total > limit { "초과" } else { "이내" };
            considerations.push(format!(
                "기존 대출 포함 총 DSR {:.1}% (한도 {:.0}% {})",
                total, limit, verdict
            ));
        }
    }

    LoanScenario {
        kind,
        title: kind.title().to_string(),
        description: format!(
            "LTV {:.1}% · 금리 {:.2}% · {}년 원리금균등",
            ltv, rate, input.term_years
        ),
        loan_amount,
        interest_rate: rate,
        monthly_payment,
        total_interest,
        total_payment: loan_amount + total_interest,
        ltv,
        dsr,
        support_program: None,
        advantages: Vec::new(),
        considerations,
    }
}

/// `1234567` → `"1,234,567"`
pub(crate) fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_advisor_core::{
        CalculatorParams, ConfigDrivenCalculator, EligibilityRule, LoanCalculator,
    };
    use proptest::prelude::*;

    fn program(name: &str, max_amount: i64, rate: f64, priority: u32) -> PolicyProgram {
        PolicyProgram {
            name: name.to_string(),
            aliases: Vec::new(),
            purpose: ProgramPurpose::Purchase,
            max_amount,
            interest_rate: rate,
            conditions: Vec::new(),
            income_verification: None,
            priority,
            eligibility: EligibilityRule::default(),
        }
    }

    fn catalog() -> Vec<PolicyProgram> {
        vec![
            program("보금자리론", 360_000_000, 3.95, 5),
            program("디딤돌 대출", 250_000_000, 2.85, 4),
        ]
    }

    fn input() -> ScenarioInput {
        ScenarioInput {
            property_price: 500_000_000,
            down_payment: 100_000_000,
            income_monthly: Some(5_000_000),
            term_years: 30,
            existing_monthly_debt: None,
        }
    }

    #[test]
    fn test_reference_purchase() {
        let calc = ConfigDrivenCalculator::new(CalculatorParams::default());
        let scenarios =
            generate_scenarios(&calc, &catalog(), &input(), &Fields::default()).unwrap();

        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].kind, ScenarioKind::MaxLeverage);
        assert_eq!(scenarios[0].loan_amount, 400_000_000);
        assert!((scenarios[0].interest_rate - 4.5).abs() < 1e-9);

        let safe = &scenarios[1];
        assert_eq!(safe.loan_amount, 300_000_000);
        let payment = calc.amortized_payment(300_000_000, 4.2, 360);
        assert_eq!(safe.monthly_payment, payment);
        assert_eq!(safe.dsr, Some(payment as f64 / 5_000_000.0 * 100.0));
        assert!((safe.ltv - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_policy_program_selection() {
        // No program covers 4억, so the first by priority is used
        let calc = ConfigDrivenCalculator::default();
        let scenarios =
            generate_scenarios(&calc, &catalog(), &input(), &Fields::default()).unwrap();
        let policy = &scenarios[2];
        assert_eq!(policy.support_program.as_deref(), Some("디딤돌 대출"));
        assert_eq!(policy.loan_amount, 250_000_000);
        assert!((policy.interest_rate - 2.85).abs() < 1e-9);

        let mut cheap = input();
        cheap.property_price = 300_000_000;
        cheap.down_payment = 60_000_000;
        let scenarios = generate_scenarios(&calc, &catalog(), &cheap, &Fields::default()).unwrap();
        // max-leverage = 2.4억, covered by 디딤돌 (2.5억)
        assert_eq!(scenarios[2].support_program.as_deref(), Some("디딤돌 대출"));
        assert_eq!(scenarios[2].loan_amount, 240_000_000);
    }

    #[test]
    fn test_select_skips_non_purchase_programs() {
        let mut programs = catalog();
        let mut jeonse = program("버팀목 전세자금", 900_000_000, 2.5, 1);
        jeonse.purpose = ProgramPurpose::Jeonse;
        programs.push(jeonse);
        let selected = select_policy_program(&programs, 100_000_000).unwrap();
        assert_eq!(selected.name, "디딤돌 대출");
        assert!(select_policy_program(&[], 1).is_none());
    }

    #[test]
    fn test_loan_never_exceeds_shortfall() {
        let calc = ConfigDrivenCalculator::default();
        let mut rich = input();
        rich.down_payment = 450_000_000;
        let scenarios = generate_scenarios(&calc, &catalog(), &rich, &Fields::default()).unwrap();
        assert!(scenarios.iter().all(|s| s.loan_amount == 50_000_000));
    }

    #[test]
    fn test_unknown_income() {
        let calc = ConfigDrivenCalculator::default();
        let mut no_income = input();
        no_income.income_monthly = None;
        let scenarios =
            generate_scenarios(&calc, &catalog(), &no_income, &Fields::default()).unwrap();
        assert_eq!(scenarios[1].loan_amount, 300_000_000);
        assert!(scenarios.iter().all(|s| s.dsr.is_none()));
    }

    #[test]
    fn test_total_dsr_note() {
        let calc = ConfigDrivenCalculator::default();
        let mut indebted = input();
        indebted.existing_monthly_debt = Some(1_000_000);
        let scenarios =
            generate_scenarios(&calc, &catalog(), &indebted, &Fields::default()).unwrap();
        assert!(scenarios[1]
            .considerations
            .iter()
            .any(|c| c.starts_with("기존 대출 포함 총 DSR")));
    }

    #[test]
    fn test_invalid_inputs() {
        let calc = ConfigDrivenCalculator::default();
        let mut bad = input();
        bad.property_price = 0;
        assert!(matches!(
            generate_scenarios(&calc, &catalog(), &bad, &Fields::default()),
            Err(CalculatorError::InvalidInput { .. })
        ));
        assert!(matches!(
            generate_scenarios(&calc, &[], &input(), &Fields::default()),
            Err(CalculatorError::CatalogMissing(_))
        ));
    }

    #[test]
    fn test_amounts_above_ceiling_are_rejected() {
        let calc = ConfigDrivenCalculator::default();
        let mut huge = input();
        huge.property_price = 9_000_000_000_000_000_000;
        let err = generate_scenarios(&calc, &catalog(), &huge, &Fields::default()).unwrap_err();
        assert!(matches!(
            err,
            CalculatorError::InvalidInput { ref param, .. } if param == "property_price"
        ));

        let mut huge_income = input();
        huge_income.income_monthly = Some(MAX_AMOUNT + 1);
        assert!(generate_scenarios(&calc, &catalog(), &huge_income, &Fields::default()).is_err());
    }

    #[test]
    fn test_eligibility_note() {
        let calc = ConfigDrivenCalculator::default();
        let mut programs = catalog();
        programs[1].eligibility.max_annual_income = Some(60_000_000);
        let profile = Fields {
            income_monthly: Some(8_000_000),
            ..Default::default()
        };
        let scenarios = generate_scenarios(&calc, &programs, &input(), &profile).unwrap();
        assert!(scenarios[2]
            .considerations
            .iter()
            .any(|c| c.contains("연소득 6000만원 이하")));
    }

    #[test]
    fn test_from_fields_uses_cash() {
        let fields = Fields {
            property_price: Some(500_000_000),
            cash_on_hand: Some(150_000_000),
            ..Default::default()
        };
        let input = ScenarioInput::from_fields(&fields).unwrap();
        assert_eq!(input.down_payment, 150_000_000);
        assert_eq!(input.term_years, 30);
        assert!(ScenarioInput::from_fields(&Fields::default()).is_none());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(900_000), "900,000");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
    }

    proptest! {
        #[test]
        fn prop_ratios_recompute(
            price in 50_000_000i64..3_000_000_000,
            down_share in 0u32..=100,
            income in 1_000_000i64..30_000_000,
            years in 1u32..=40,
        ) {
            let calc = ConfigDrivenCalculator::default();
            let input = ScenarioInput {
                property_price: price,
                down_payment: price * down_share as i64 / 100,
                income_monthly: Some(income),
                term_years: years,
                existing_monthly_debt: None,
            };
            let scenarios = generate_scenarios(&calc, &catalog(), &input, &Fields::default()).unwrap();
            for s in &scenarios {
                prop_assert_eq!(s.ltv, s.loan_amount as f64 / price as f64 * 100.0);
                prop_assert_eq!(s.dsr, Some(s.monthly_payment as f64 / income as f64 * 100.0));
                prop_assert_eq!(s.total_payment, s.loan_amount + s.total_interest);
                prop_assert_eq!(s.total_interest, s.monthly_payment * (years as i64 * 12) - s.loan_amount);
                prop_assert!(s.loan_amount <= input.shortfall());
            }
        }
    }
}
