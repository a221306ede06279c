//! Korean currency amount parsing
//!
//! Converts mixed numeral/unit expressions ("3억2500만원", "500만", "1.5~6억") into
//! whole won. The parser never guesses a unit for a short bare number: "500" alone is
//! `None`. Slot extractors that know their context resolve bare numbers through an
//! explicit [`BareUnit`] policy instead.
//!
//! Pattern priority on the normalized text:
//! 1. range `A~B억` (lower bound)
//! 2. `X억` with an optional tail (`Y천`, `Y만`, `Y천Z만`, or a bare `Y`)
//! 3. `X천만`, `X백만`, `X만`
//! 4. bare number with 4+ integer digits, taken as won
//!
//! Amounts above [`MAX_AMOUNT`] are not recognized.

use once_cell::sync::Lazy;
use regex::Regex;

use housing_advisor_core::{is_valid_amount, MAX_AMOUNT};

pub const EOK: i64 = 100_000_000;
pub const CHEONMAN: i64 = 10_000_000;
pub const BAEKMAN: i64 = 1_000_000;
pub const MAN: i64 = 10_000;

/// Amount token for embedding in slot regexes, always capture group-free.
///
/// Matches `5억`, `5.4억`, `3억2천`, `3억2500만`, `2천만`, `7천`, `500만`, and bare `500`.
pub const AMOUNT_TOKEN: &str =
    r"\d+(?:\.\d+)?억(?:\d+천)?(?:\d+백)?\d*만?|\d+(?:\.\d+)?(?:천만|백만|만|천)|\d+(?:\.\d+)?";

static DIGIT_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d),(\d{3})").unwrap());
static DIGIT_UNIT_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s+(억|천|백|만|원)").unwrap());
static EOK_TAIL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"억\s+(\d+(?:천|백|만))").unwrap());
static UNIT_MAN_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(천|백)\s+만").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(억|천만|백만|만)?\s*[~〜∼]\s*(\d+(?:\.\d+)?)(억|천만|백만|만)")
        .unwrap()
});
static EOK_COMPOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)억((?:\d+천)?(?:\d+백)?\d*만?)").unwrap()
});
static EOK_TAIL_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+)천)?(?:(\d+)백)?(\d*)만?$").unwrap());
static UNIT_PATTERNS: Lazy<Vec<(Regex, i64)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(\d+(?:\.\d+)?)천만").unwrap(), CHEONMAN),
        (Regex::new(r"(\d+(?:\.\d+)?)백만").unwrap(), BAEKMAN),
        (Regex::new(r"(\d+(?:\.\d+)?)만").unwrap(), MAN),
    ]
});
static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)(?:\.\d+)?").unwrap());

/// Characters that, right after `X억Y`, mark `Y` as something other than money
const NON_MONEY_SUFFIXES: &[char] = &[
    '년', '개', '월', '%', '살', '세', '등', '평', '회', '층', '동', '호', '명', '번', '시', '일',
];

/// How a slot interprets a number written without any unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareUnit {
    /// Monthly/cash figures: `500` means 500만원 unless already ≥ 100,000
    Man,
    /// Property-scale figures: `5` means 5억, `3000` means 3000만, ≥ 100,000 is won
    EokIfSmall,
}

impl BareUnit {
    /// Apply the policy to an already parsed bare number string
    pub fn resolve(&self, number: &str) -> Option<i64> {
        let literal = scale_decimal(number, 1)?;
        match self {
            BareUnit::Man => {
                if literal >= 100_000 {
                    Some(literal)
                } else {
                    scale_decimal(number, MAN)
                }
            }
            BareUnit::EokIfSmall => {
                if literal < 100 {
                    scale_decimal(number, EOK)
                } else if literal < 100_000 {
                    scale_decimal(number, MAN)
                } else {
                    Some(literal)
                }
            }
        }
    }
}

/// Lowercase, drop thousands separators and glue numbers to their units.
///
/// `"3억 2,500 만원"` becomes `"3억2500만원"`. A bare number after `억` is only glued
/// when it carries its own unit, so `"5억 30년"` stays apart.
pub fn normalize_amount_text(text: &str) -> String {
    let mut s = text.to_lowercase();

    loop {
        let next = DIGIT_COMMA.replace_all(&s, "${1}${2}").into_owned();
        if next == s {
            break;
        }
        s = next;
    }

    let s = DIGIT_UNIT_SPACE.replace_all(&s, "${1}${2}");
    let s = UNIT_MAN_SPACE.replace_all(&s, "${1}만");
    let s = EOK_TAIL_SPACE.replace_all(&s, "억${1}");
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Parse the first amount in `text` into won
pub fn parse_amount(text: &str) -> Option<i64> {
    let normalized = normalize_amount_text(text);
    parse_normalized(&normalized)
}

/// Parse a range such as `"1.5~6억"` into `(lower, upper)` won.
///
/// A unitless lower bound takes the upper bound's unit.
pub fn parse_amount_range(text: &str) -> Option<(i64, i64)> {
    let normalized = normalize_amount_text(text);
    range_in(&normalized)
}

/// Resolve an amount token captured by a slot regex.
///
/// Tokens with a unit go through the regular grammar; bare numbers use `policy`.
/// Inside a money slot a lone `X천` ("연봉 7천") is read as X천만.
pub fn resolve_amount_token(token: &str, policy: BareUnit) -> Option<i64> {
    let token = token.trim();
    if let Some(number) = token.strip_suffix('천') {
        if !number.contains(['억', '천', '백', '만']) {
            return scale_decimal(number, CHEONMAN).filter(|won| is_valid_amount(*won));
        }
    }
    if token.contains(['억', '천', '백', '만']) {
        parse_normalized(token)
    } else {
        policy.resolve(token).filter(|won| is_valid_amount(*won))
    }
}

/// True when `text` contains an amount with a unit or a 4+ digit number
pub fn contains_amount(text: &str) -> bool {
    parse_amount(text).is_some()
}

fn parse_normalized(s: &str) -> Option<i64> {
    parse_unbounded(s).filter(|won| is_valid_amount(*won))
}

fn parse_unbounded(s: &str) -> Option<i64> {
    if let Some((low, _)) = range_in(s) {
        return Some(low);
    }

    if let Some(value) = eok_in(s) {
        return Some(value);
    }

    for (pattern, unit) in UNIT_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(s) {
            return scale_decimal(&caps[1], *unit);
        }
    }

    BARE_NUMBER
        .captures_iter(s)
        .find(|caps| caps[1].len() >= 4)
        .and_then(|caps| caps[1].parse::<i64>().ok())
}

fn range_in(s: &str) -> Option<(i64, i64)> {
    let caps = RANGE.captures(s)?;
    let upper_unit = unit_value(&caps[4])?;
    let lower_unit = match caps.get(2) {
        Some(unit) => unit_value(unit.as_str())?,
        None => upper_unit,
    };
    let low = scale_decimal(&caps[1], lower_unit)?;
    let high = scale_decimal(&caps[3], upper_unit)?;
    if high > MAX_AMOUNT {
        return None;
    }
    Some((low, high))
}

fn eok_in(s: &str) -> Option<i64> {
    let caps = EOK_COMPOUND.captures(s)?;
    let whole = caps.get(0)?;
    let base = scale_decimal(&caps[1], EOK)?;
    let next = s[whole.end()..].chars().next();
    let tail = eok_tail_won(&caps[2], next)?;
    base.checked_add(tail)
}

/// Won value of whatever follows `억`
fn eok_tail_won(tail: &str, next: Option<char>) -> Option<i64> {
    if tail.is_empty() {
        return Some(0);
    }

    if tail.contains(['천', '백', '만']) {
        let caps = EOK_TAIL_PARTS.captures(tail)?;
        let part = |i: usize| -> Option<i64> {
            match caps.get(i) {
                Some(m) if !m.as_str().is_empty() => m.as_str().parse().ok(),
                _ => Some(0),
            }
        };
        let man = part(1)?
            .checked_mul(1000)?
            .checked_add(part(2)?.checked_mul(100)?)?
            .checked_add(part(3)?)?;
        return man.checked_mul(MAN);
    }

    // bare tail: "3억2" is 3억2천만, "3억2500" is 3억2500만
    if next.is_some_and(|c| NON_MONEY_SUFFIXES.contains(&c)) {
        return Some(0);
    }
    let digits: i64 = tail.parse().ok()?;
    if tail.len() == 1 {
        digits.checked_mul(CHEONMAN)
    } else {
        digits.checked_mul(MAN)
    }
}

fn unit_value(unit: &str) -> Option<i64> {
    match unit {
        "억" => Some(EOK),
        "천만" => Some(CHEONMAN),
        "백만" => Some(BAEKMAN),
        "만" => Some(MAN),
        _ => None,
    }
}

/// `number × unit` using integer arithmetic, truncating below one won
fn scale_decimal(number: &str, unit: i64) -> Option<i64> {
    let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let int: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let mut value = int.checked_mul(unit)?;

    let frac_part = &frac_part[..frac_part.len().min(6)];
    if !frac_part.is_empty() {
        let frac: i64 = frac_part.parse().ok()?;
        let denom = 10_i64.pow(frac_part.len() as u32);
        value = value.checked_add(frac.checked_mul(unit)? / denom)?;
    }

    Some(value)
}

/// Format won the way Korean users write it: `"3억2500만원"`, `"900만원"`, `"0원"`
pub fn format_korean_amount(won: i64) -> String {
    if won < 0 {
        return format!("-{}", format_korean_amount(-won));
    }
    if won == 0 {
        return "0원".to_string();
    }

    let eok = won / EOK;
    let man = (won % EOK) / MAN;
    let rest = won % MAN;

    let mut out = String::new();
    if eok > 0 {
        out.push_str(&format!("{}억", eok));
    }
    if man > 0 {
        out.push_str(&format!("{}만", man));
    }
    if rest > 0 {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&rest.to_string());
    }
    out.push('원');
    out
}

/// Format won with a currency sign and thousands separators: `"₩900,000"`
pub fn format_won(won: i64) -> String {
    let digits = won.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if won < 0 {
        format!("-₩{}", grouped)
    } else {
        format!("₩{}", grouped)
    }
}
