//! Slot Value Extraction
//!
//! Rule-based extraction of the fixed `Fields` schema from one Korean message.
//!
//! Every slot owns an ordered list of static patterns (compiled once with
//! `once_cell::sync::Lazy`); the first pattern that yields a value wins and slots never
//! share state within a call. Numbers written without a unit are resolved through the
//! slot's [`BareUnit`] policy, never guessed by the amount parser.
//!
//! Domain data that can change (policy program names, purpose keywords) comes from the
//! domain config via [`SlotExtractor::from_config`].

use once_cell::sync::Lazy;
use regex::Regex;

use housing_advisor_config::MasterDomainConfig;
use housing_advisor_core::{
    Fields, MaritalStatus, PolicyProgram, PropertyType, Purpose, Region, MAX_LOAN_PERIOD_YEARS,
};

use crate::amount::{normalize_amount_text, resolve_amount_token, BareUnit, AMOUNT_TOKEN};
use crate::korean::{compact, NormalizedText};

// =============================================================================
// STATIC REGEX PATTERNS - Compiled once at program start
// =============================================================================

/// Optional particle / hedge between a keyword and its amount ("월소득은 약 500만")
const GAP: &str = r"\s*(?:은|는|이|가|:|=)?\s*(?:약|대략|총|한)?\s*";

/// `{prefix}(?P<amt>AMOUNT){suffix}`
fn amount_pattern(prefix: &str, suffix: &str) -> Regex {
    Regex::new(&format!("{prefix}(?P<amt>{AMOUNT_TOKEN}){suffix}")).unwrap()
}

static INCOME_MONTHLY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        amount_pattern(
            &format!(
                r"(?:월\s*(?:소득|수입|급여|실수령액?)|월급|한\s*달\s*(?:소득|수입|월급)|세후\s*월){GAP}"
            ),
            "",
        ),
        amount_pattern(r"(?:소득|수입)\s*(?:은|는|이)?\s*월\s*", ""),
        amount_pattern(r"월\s*", r"\s*(?:정도\s*)?(?:벌|받아|받고|받는)"),
    ]
});

static INCOME_ANNUAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![amount_pattern(
        &format!(
            r"(?:연\s*(?:소득|수입|봉)|부부\s*합산(?:\s*연?\s*소득)?|합산\s*연?\s*소득|세전\s*연){GAP}"
        ),
        "",
    )]
});

static NO_INCOME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:소득|수입)\s*(?:이|은|는)?\s*(?:없|0원|zero)|무소득").unwrap());

static CASH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        amount_pattern(
            &format!(
                r"(?:보유\s*(?:현금|자금|자산)?|현금|가용\s*자금|여유\s*자금|모은\s*돈|저축액?|예금|가진\s*돈|있는\s*돈){GAP}"
            ),
            "",
        ),
        // "대출 1억 있어요" is a balance owed, not cash
        amount_pattern(
            r"(?:(?P<excluded>대출|부채|빚|할부|마이너스\s*통장)\s*(?:잔액|잔금)?\s*(?:이|은|는|도|가)?\s*)?",
            r"\s*(?:원)?\s*(?:정도\s*)?(?:모았|있어|있고|있는데|있습니다)",
        ),
    ]
});

static DOWN_PAYMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        amount_pattern(
            &format!(
                r"(?:자기\s*자본|자기\s*자금|자본금|자부담|내\s*돈|종[잣자]돈|다운\s*페이(?:먼트)?){GAP}"
            ),
            "",
        ),
        amount_pattern("", r"\s*(?:원)?\s*(?:은|는|을|를)?\s*(?:내가\s*)?(?:보태|부담)"),
    ]
});

static PRICE_KEYWORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![amount_pattern(
        &format!(
            r"(?:매매\s*(?:가격?|가|금액)?|매매가|집\s*(?:값|가격)|주택\s*(?:가격|가액)|분양\s*가|아파트\s*(?:값|가격)|시세|가격|구입\s*가|매수\s*가){GAP}"
        ),
        "",
    )]
});

/// Price written before the thing being bought; a preceding lease word disqualifies it
static PRICE_CONTEXT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        amount_pattern(
            r"(?:(?P<lease>전세|보증금|월세|반전세)\s*)?",
            r"\s*(?:원)?\s*(?:짜리\s*)?(?:집|아파트|주택|빌라|오피스텔|매물|단독)",
        ),
        amount_pattern(
            r"(?:(?P<lease>전세|보증금|월세|반전세)\s*)?",
            r"\s*(?:원)?\s*(?:에|으로|로)?\s*(?:구입|매수|구매|사려|살려|사고|살까|매입)",
        ),
    ]
});

static LOAN_PERIOD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:만기|상환\s*기간|대출\s*기간|기간)\s*(?:은|는|이|:)?\s*(\d{1,2})\s*년").unwrap(),
        Regex::new(r"(\d{1,2})\s*년\s*(?:만기|상환|동안|짜리|대출|분할|원리금)").unwrap(),
    ]
});

static MONTHLY_DEBT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        amount_pattern(
            &format!(
                r"(?:기존\s*)?(?:대출|부채|빚|할부|신용대출|마이너스\s*통장)\s*(?:상환|이자|원리금|갚는\s*돈)?\s*(?:이|은|는|으로|로)?\s*(?:매달|매월|월)\s*(?:상환\s*)?{GAP}"
            ),
            "",
        ),
        amount_pattern(
            &format!(r"(?:월\s*(?:상환액|상환|납입액?|원리금)|매달\s*(?:갚는|나가는)\s*(?:돈|금액)?){GAP}"),
            "",
        ),
    ]
});

static NO_DEBT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:대출|부채|빚)\s*(?:은|이|는|도)?\s*(?:전혀\s*|하나도\s*)?(?:없|0원)|무부채").unwrap()
});
static HAS_DEBT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"기존\s*대출|(?:대출|부채|빚)\s*(?:이|도|은)?\s*(?:있|남아)|신용대출|마이너스\s*통장|자동차\s*할부|학자금").unwrap()
});

static CREDIT_TIER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:신용\s*(?:등급|도)?|등급)\s*(?:은|는|이|:)?\s*(\d{1,2})\s*등급?").unwrap(),
        Regex::new(r"(\d{1,2})\s*등급").unwrap(),
    ]
});

static NOT_FIRST_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:유|1|2|다)\s*주택|집\s*(?:이|은)?\s*(?:있|한\s*채)|두\s*번째\s*집|갈아타기\s*매수").unwrap()
});
static FIRST_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"생애\s*(?:최초|첫)|무주택|첫\s*집|처음\s*(?:집|사|구입|매수)|첫\s*주택").unwrap()
});

static NEWBORN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"신생아|출산\s*(?:예정|했|한\s*지)|아기\s*(?:가|를)?\s*(?:낳|태어)|갓난").unwrap());
static NO_CHILDREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:자녀|아이|애)\s*(?:는|가|도)?\s*(?:없|아직)|무자녀|딩크").unwrap());
static CHILDREN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"자녀|아이\s*(?:가|가\s*있|\d+\s*명)|애\s*(?:가\s*)?(?:\d+|하나|둘|셋)|다자녀|아들|딸").unwrap()
});

static NON_REGULATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"비\s*규제|규제\s*(?:지역)?\s*(?:아님|아니|밖|외|해제)|비조정").unwrap());
static REGULATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"규제\s*(?:지역|지구|대상\s*지역)|조정\s*(?:대상)?\s*지역|투기\s*(?:과열)?\s*지구").unwrap());

static MARITAL_PLANNING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"결혼\s*(?:예정|준비|할\s*예정|을?\s*앞두)|예비\s*(?:신혼)?\s*부부|예비\s*신혼|상견례").unwrap()
});
static MARITAL_MARRIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"기혼|신혼|결혼\s*(?:했|한\s*지|\d+\s*년)|부부|배우자|와이프|아내|남편").unwrap()
});
static MARITAL_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"미혼|싱글|혼자\s*(?:살|사는)|1인\s*가구|독신").unwrap());

static APARTMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"아파트|apt").unwrap());
static NON_APARTMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"빌라|다세대|연립|오피스텔|단독\s*주택|다가구|원룸|투룸").unwrap());

static JEONSE_DEPOSIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        amount_pattern(&format!(r"(?:전세\s*(?:보증금|금|가)?|보증금){GAP}"), ""),
        amount_pattern("", r"\s*(?:원)?\s*(?:짜리\s*)?전세"),
    ]
});

static MONTHLY_RENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        amount_pattern(&format!(r"(?:월세|월\s*임대료|월\s*차임){GAP}"), ""),
        amount_pattern(
            &format!(
                r"(?:보증금|반전세|월세){GAP}(?:{AMOUNT_TOKEN})\s*(?:원)?\s*/\s*(?:월세?\s*)?"
            ),
            "",
        ),
    ]
});

static REQUESTED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![amount_pattern(
        &format!(r"(?:신청\s*(?:액|금액|한도)?|필요\s*(?:한\s*)?(?:금액|자금|대출)|받으려던\s*(?:금액|대출)?|원래\s*(?:한도|계획)|희망\s*(?:금액|한도)){GAP}"),
        "",
    )]
});

static APPRAISED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![amount_pattern(
        &format!(r"(?:감정\s*(?:가|가액|평가액|금액)|탁감|감정\s*결과|나온\s*(?:한도|감정가)){GAP}"),
        "",
    )]
});

/// Purpose keyword defaults used when no domain config is supplied
const DEFAULT_PURCHASE_KEYWORDS: &[&str] = &["매매", "구입", "매수", "구매", "내 집 마련", "분양"];
const DEFAULT_JEONSE_KEYWORDS: &[&str] = &["전세", "월세", "반전세", "보증금"];
const DEFAULT_REFI_KEYWORDS: &[&str] = &["대환", "갈아타", "재융자", "전환"];

/// First amount any pattern yields, in pattern order
/// First amount any pattern captures as `amt`; matches that also capture `excluded` are skipped
fn first_amount(patterns: &[Regex], text: &str, policy: BareUnit) -> Option<i64> {
    patterns.iter().find_map(|pattern| {
        pattern.captures_iter(text).find_map(|caps| {
            if caps.name("excluded").is_some() {
                return None;
            }
            let token = caps.name("amt")?;
            if is_followed_by_non_money(text, token.end()) {
                return None;
            }
            resolve_amount_token(token.as_str(), policy)
        })
    })
}

/// A bare number followed by a counter ("30년", "3%") is not money
fn is_followed_by_non_money(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '년' | '개' | '%' | '살' | '평' | '층' | '명' | '등' | '회'))
}

fn first_number<T: std::str::FromStr>(patterns: &[Regex], text: &str) -> Option<T> {
    patterns
        .iter()
        .find_map(|pattern| pattern.captures(text)?.get(1)?.as_str().parse().ok())
}

// =============================================================================
// SLOT EXTRACTOR
// =============================================================================

/// One searchable program alias
#[derive(Debug, Clone)]
struct ProgramAlias {
    /// Whitespace-free lowercase form
    alias: String,
    /// Canonical program name
    program: String,
}

/// Slot extractor for housing-finance messages
///
/// Static patterns are shared; the instance only carries domain data (program aliases and
/// purpose keywords), so construction is cheap and the extractor is `Send + Sync`.
#[derive(Debug, Clone)]
pub struct SlotExtractor {
    /// Sorted longest alias first so "신생아 특례 디딤돌" beats "디딤돌"
    program_aliases: Vec<ProgramAlias>,
    purchase_keywords: Vec<String>,
    jeonse_keywords: Vec<String>,
    refi_keywords: Vec<String>,
}

impl Default for SlotExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotExtractor {
    /// Extractor with default purpose keywords and no program catalog
    pub fn new() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            program_aliases: Vec::new(),
            purchase_keywords: owned(DEFAULT_PURCHASE_KEYWORDS),
            jeonse_keywords: owned(DEFAULT_JEONSE_KEYWORDS),
            refi_keywords: owned(DEFAULT_REFI_KEYWORDS),
        }
    }

    /// Extractor wired to a domain config: its catalog and purpose vocabulary
    pub fn from_config(config: &MasterDomainConfig) -> Self {
        let mut extractor = Self::with_programs(&config.programs);
        let vocabulary = &config.vocabulary;
        if !vocabulary.purchase.is_empty() {
            extractor.purchase_keywords = vocabulary.purchase.clone();
        }
        if !vocabulary.jeonse.is_empty() {
            extractor.jeonse_keywords = vocabulary.jeonse.clone();
        }
        if !vocabulary.refi.is_empty() {
            extractor.refi_keywords = vocabulary.refi.clone();
        }
        extractor
    }

    /// Extractor that recognizes the names and aliases of `programs`
    pub fn with_programs(programs: &[PolicyProgram]) -> Self {
        let mut program_aliases: Vec<ProgramAlias> = programs
            .iter()
            .flat_map(|program| {
                program.names().map(move |name| ProgramAlias {
                    alias: compact(name),
                    program: program.name.clone(),
                })
            })
            .filter(|alias| !alias.alias.is_empty())
            .collect();
        program_aliases.sort_by(|a, b| b.alias.chars().count().cmp(&a.alias.chars().count()));

        Self {
            program_aliases,
            ..Self::new()
        }
    }

    /// Extract every slot from one message
    pub fn extract(&self, text: &str) -> Fields {
        let normalized = NormalizedText::new(text);
        self.extract_normalized(&normalized)
    }

    /// Extract from an already normalized message
    pub fn extract_normalized(&self, text: &NormalizedText) -> Fields {
        let s = text.normalized.as_str();

        let monthly_debt_payment = self.extract_monthly_debt(s);
        let has_existing_debt = match self.extract_has_existing_debt(s) {
            Some(flag) => Some(flag),
            None => monthly_debt_payment.map(|_| true),
        };
        let has_newborn = self.extract_has_newborn(s);
        let has_children = match self.extract_has_children(s) {
            Some(flag) => Some(flag),
            None => has_newborn.filter(|newborn| *newborn),
        };

        let fields = Fields {
            income_monthly: self.extract_income_monthly(s),
            cash_on_hand: self.extract_cash_on_hand(s),
            property_price: self.extract_property_price(s),
            down_payment: self.extract_down_payment(s),
            loan_period_years: self.extract_loan_period(s),
            region: self.extract_region(s),
            purpose: self.extract_purpose(text),
            marital_status: self.extract_marital_status(s),
            property_type: self.extract_property_type(s),
            has_existing_debt,
            monthly_debt_payment,
            policy_mention: self.mentioned_programs(text).into_iter().next(),
            credit_tier: self.extract_credit_tier(s),
            first_time_buyer: self.extract_first_time_buyer(s),
            has_newborn,
            has_children,
        };

        tracing::trace!(
            income = ?fields.income_monthly,
            price = ?fields.property_price,
            down_payment = ?fields.down_payment,
            purpose = ?fields.purpose,
            "Extracted slots"
        );
        fields
    }

    /// Monthly income in won. Annual phrases are divided by 12; "소득 없음" is 0.
    pub fn extract_income_monthly(&self, text: &str) -> Option<i64> {
        let s = normalize_amount_text(text);
        if let Some(monthly) = first_amount(&INCOME_MONTHLY_PATTERNS, &s, BareUnit::Man) {
            return Some(monthly);
        }
        if let Some(annual) = first_amount(&INCOME_ANNUAL_PATTERNS, &s, BareUnit::Man) {
            return Some((annual as f64 / 12.0).round() as i64);
        }
        if NO_INCOME.is_match(&s) {
            return Some(0);
        }
        None
    }

    pub fn extract_cash_on_hand(&self, text: &str) -> Option<i64> {
        first_amount(&CASH_PATTERNS, &normalize_amount_text(text), BareUnit::Man)
    }

    pub fn extract_down_payment(&self, text: &str) -> Option<i64> {
        first_amount(&DOWN_PAYMENT_PATTERNS, &normalize_amount_text(text), BareUnit::Man)
    }

    /// Purchase price. Amounts tied to 전세/보증금/월세 never count as a price.
    pub fn extract_property_price(&self, text: &str) -> Option<i64> {
        let s = normalize_amount_text(text);
        if let Some(price) = first_amount(&PRICE_KEYWORD_PATTERNS, &s, BareUnit::EokIfSmall) {
            return Some(price);
        }
        PRICE_CONTEXT_PATTERNS.iter().find_map(|pattern| {
            pattern.captures_iter(&s).find_map(|caps| {
                if caps.name("lease").is_some() {
                    return None;
                }
                let token = caps.name("amt")?;
                resolve_amount_token(token.as_str(), BareUnit::EokIfSmall)
            })
        })
    }

    /// Loan term, accepted only within 1..=MAX_LOAN_PERIOD_YEARS
    pub fn extract_loan_period(&self, text: &str) -> Option<u32> {
        first_number::<u32>(&LOAN_PERIOD_PATTERNS, &normalize_amount_text(text))
            .filter(|years| (1..=MAX_LOAN_PERIOD_YEARS).contains(years))
    }

    pub fn extract_monthly_debt(&self, text: &str) -> Option<i64> {
        first_amount(&MONTHLY_DEBT_PATTERNS, &normalize_amount_text(text), BareUnit::Man)
    }

    /// Explicit "no debt" statements are checked before debt mentions
    pub fn extract_has_existing_debt(&self, text: &str) -> Option<bool> {
        let s = normalize_amount_text(text);
        if NO_DEBT.is_match(&s) {
            Some(false)
        } else if HAS_DEBT.is_match(&s) {
            Some(true)
        } else {
            None
        }
    }

    /// Credit grade within 1..=10
    pub fn extract_credit_tier(&self, text: &str) -> Option<u8> {
        first_number::<u8>(&CREDIT_TIER_PATTERNS, &normalize_amount_text(text))
            .filter(|tier| (1..=10).contains(tier))
    }

    pub fn extract_first_time_buyer(&self, text: &str) -> Option<bool> {
        let s = normalize_amount_text(text);
        if NOT_FIRST_TIME.is_match(&s) && !FIRST_TIME.is_match(&s) {
            Some(false)
        } else if FIRST_TIME.is_match(&s) {
            Some(true)
        } else {
            None
        }
    }

    pub fn extract_has_newborn(&self, text: &str) -> Option<bool> {
        NEWBORN.is_match(&normalize_amount_text(text)).then_some(true)
    }

    pub fn extract_has_children(&self, text: &str) -> Option<bool> {
        let s = normalize_amount_text(text);
        if NO_CHILDREN.is_match(&s) {
            Some(false)
        } else if CHILDREN.is_match(&s) || NEWBORN.is_match(&s) {
            Some(true)
        } else {
            None
        }
    }

    pub fn extract_region(&self, text: &str) -> Region {
        let s = normalize_amount_text(text);
        if NON_REGULATED.is_match(&s) {
            Region::NonRegulated
        } else if REGULATED.is_match(&s) {
            Region::Regulated
        } else {
            Region::Unknown
        }
    }

    /// Purpose keywords in fixed order: purchase, jeonse, refi
    pub fn extract_purpose(&self, text: &NormalizedText) -> Purpose {
        if text.contains_any(&self.purchase_keywords) {
            Purpose::Purchase
        } else if text.contains_any(&self.jeonse_keywords) {
            Purpose::Jeonse
        } else if text.contains_any(&self.refi_keywords) {
            Purpose::Refi
        } else {
            Purpose::Unknown
        }
    }

    pub fn extract_marital_status(&self, text: &str) -> MaritalStatus {
        let s = normalize_amount_text(text);
        if MARITAL_PLANNING.is_match(&s) {
            MaritalStatus::Planning
        } else if MARITAL_MARRIED.is_match(&s) {
            MaritalStatus::Married
        } else if MARITAL_SINGLE.is_match(&s) {
            MaritalStatus::Single
        } else {
            MaritalStatus::Unknown
        }
    }

    pub fn extract_property_type(&self, text: &str) -> PropertyType {
        let s = normalize_amount_text(text);
        if APARTMENT.is_match(&s) {
            PropertyType::Apartment
        } else if NON_APARTMENT.is_match(&s) {
            PropertyType::NonApartment
        } else {
            PropertyType::Unknown
        }
    }

    /// Canonical names of every program mentioned, in order of appearance.
    ///
    /// Longer aliases are matched first and their span is consumed, so "신생아 특례
    /// 디딤돌" is not also reported as "디딤돌".
    pub fn mentioned_programs(&self, text: &NormalizedText) -> Vec<String> {
        let mut haystack: Vec<char> = text.compact.chars().collect();
        let mut found: Vec<(usize, String)> = Vec::new();

        for entry in &self.program_aliases {
            let needle: Vec<char> = entry.alias.chars().collect();
            if needle.is_empty() || needle.len() > haystack.len() {
                continue;
            }
            let mut start = 0;
            while start + needle.len() <= haystack.len() {
                if haystack[start..start + needle.len()] == needle[..] {
                    if !found.iter().any(|(_, name)| name == &entry.program) {
                        found.push((start, entry.program.clone()));
                    }
                    for c in &mut haystack[start..start + needle.len()] {
                        *c = '\u{0}';
                    }
                    start += needle.len();
                } else {
                    start += 1;
                }
            }
        }

        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, name)| name).collect()
    }

    /// Jeonse deposit ("전세 3억", "보증금 2억")
    pub fn extract_jeonse_deposit(&self, text: &str) -> Option<i64> {
        first_amount(
            &JEONSE_DEPOSIT_PATTERNS,
            &normalize_amount_text(text),
            BareUnit::EokIfSmall,
        )
    }

    /// Monthly rent ("월세 80만", "보증금 1억/50")
    pub fn extract_monthly_rent(&self, text: &str) -> Option<i64> {
        first_amount(&MONTHLY_RENT_PATTERNS, &normalize_amount_text(text), BareUnit::Man)
    }

    /// Loan amount the user applied for or needs
    pub fn extract_requested_amount(&self, text: &str) -> Option<i64> {
        first_amount(&REQUESTED_PATTERNS, &normalize_amount_text(text), BareUnit::EokIfSmall)
    }

    /// Appraised value or the limit that came back from appraisal
    pub fn extract_appraised_amount(&self, text: &str) -> Option<i64> {
        first_amount(&APPRAISED_PATTERNS, &normalize_amount_text(text), BareUnit::EokIfSmall)
    }
}
