//! Conversation slots
//!
//! `Fields` is the fixed slot schema extracted from user text and accumulated by the
//! caller across turns. Every field is independently optional: absence means "not yet
//! known" and is what drives the missing-info prompt. Enumerated slots use an explicit
//! `Unknown` variant instead of `Option` so that they serialize the same way the caller
//! stores them.

use serde::{Deserialize, Serialize};

/// Default loan term when the user never states one
pub const DEFAULT_LOAN_PERIOD_YEARS: u32 = 30;

/// Longest loan term a slot may hold
pub const MAX_LOAN_PERIOD_YEARS: u32 = 50;

/// Largest currency amount any slot may hold (1,000조원)
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// True when `won` is a usable slot amount: `0..=MAX_AMOUNT`
pub fn is_valid_amount(won: i64) -> bool {
    (0..=MAX_AMOUNT).contains(&won)
}

/// Regulation status of the property location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Regulated,
    NonRegulated,
    #[default]
    Unknown,
}

/// What the user is financing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Purchase,
    Jeonse,
    Refi,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    /// Marriage planned (예비 신혼부부)
    Planning,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    NonApartment,
    #[default]
    Unknown,
}

/// Stable slot keys used by intent definitions and missing-slot reporting
pub mod slot_keys {
    pub const INCOME_MONTHLY: &str = "income_monthly";
    pub const CASH_ON_HAND: &str = "cash_on_hand";
    pub const PROPERTY_PRICE: &str = "property_price";
    pub const DOWN_PAYMENT: &str = "down_payment";
    pub const LOAN_PERIOD_YEARS: &str = "loan_period_years";
    pub const REGION: &str = "region";
    pub const PURPOSE: &str = "purpose";
    pub const MARITAL_STATUS: &str = "marital_status";
    pub const PROPERTY_TYPE: &str = "property_type";
    pub const HAS_EXISTING_DEBT: &str = "has_existing_debt";
    pub const MONTHLY_DEBT_PAYMENT: &str = "monthly_debt_payment";
    pub const POLICY_MENTION: &str = "policy_mention";
    pub const CREDIT_TIER: &str = "credit_tier";
    pub const FIRST_TIME_BUYER: &str = "first_time_buyer";
    pub const HAS_NEWBORN: &str = "has_newborn";
    pub const HAS_CHILDREN: &str = "has_children";

    /// Every key `Fields::has_slot` understands
    pub const ALL: &[&str] = &[
        INCOME_MONTHLY,
        CASH_ON_HAND,
        PROPERTY_PRICE,
        DOWN_PAYMENT,
        LOAN_PERIOD_YEARS,
        REGION,
        PURPOSE,
        MARITAL_STATUS,
        PROPERTY_TYPE,
        HAS_EXISTING_DEBT,
        MONTHLY_DEBT_PAYMENT,
        POLICY_MENTION,
        CREDIT_TIER,
        FIRST_TIME_BUYER,
        HAS_NEWBORN,
        HAS_CHILDREN,
    ];
}

/// Slot values known about the user. Currency amounts are whole won.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_monthly: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_on_hand: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<i64>,
    /// Stored only when stated; read through [`Fields::loan_period_years`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_period_years: Option<u32>,
    pub region: Region,
    pub purpose: Purpose,
    pub marital_status: MaritalStatus,
    pub property_type: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_existing_debt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_debt_payment: Option<i64>,
    /// Canonical name of a policy program the user named
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_mention: Option<String>,
    /// Credit grade, 1 (best) to 10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_tier: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_time_buyer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_newborn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a newer set of fields over this one.
    ///
    /// `merged.field = newer.field ?? self.field` for every slot; `Unknown` counts as
    /// absent for enumerated slots. Values are replaced, never accumulated.
    pub fn merge(&self, newer: &Fields) -> Fields {
        Fields {
            income_monthly: newer.income_monthly.or(self.income_monthly),
            cash_on_hand: newer.cash_on_hand.or(self.cash_on_hand),
            property_price: newer.property_price.or(self.property_price),
            down_payment: newer.down_payment.or(self.down_payment),
            loan_period_years: newer.loan_period_years.or(self.loan_period_years),
            region: if newer.region != Region::Unknown {
                newer.region
            } else {
                self.region
            },
            purpose: if newer.purpose != Purpose::Unknown {
                newer.purpose
            } else {
                self.purpose
            },
            marital_status: if newer.marital_status != MaritalStatus::Unknown {
                newer.marital_status
            } else {
                self.marital_status
            },
            property_type: if newer.property_type != PropertyType::Unknown {
                newer.property_type
            } else {
                self.property_type
            },
            has_existing_debt: newer.has_existing_debt.or(self.has_existing_debt),
            monthly_debt_payment: newer.monthly_debt_payment.or(self.monthly_debt_payment),
            policy_mention: newer
                .policy_mention
                .clone()
                .or_else(|| self.policy_mention.clone()),
            credit_tier: newer.credit_tier.or(self.credit_tier),
            first_time_buyer: newer.first_time_buyer.or(self.first_time_buyer),
            has_newborn: newer.has_newborn.or(self.has_newborn),
            has_children: newer.has_children.or(self.has_children),
        }
    }

    /// Loan term in years, defaulting to 30 when never stated
    pub fn loan_period_years(&self) -> u32 {
        self.loan_period_years.unwrap_or(DEFAULT_LOAN_PERIOD_YEARS)
    }

    /// Down payment used for computation: the stated down payment, else cash on hand
    pub fn effective_down_payment(&self) -> Option<i64> {
        self.down_payment.or(self.cash_on_hand)
    }

    /// Annual income derived from the monthly figure
    pub fn annual_income(&self) -> Option<i64> {
        self.income_monthly.map(|m| m.saturating_mul(12))
    }

    /// Copy with every currency amount outside `0..=MAX_AMOUNT` and any loan term
    /// outside `1..=MAX_LOAN_PERIOD_YEARS` dropped
    pub fn within_limits(&self) -> Fields {
        let bounded = |v: Option<i64>| v.filter(|won| is_valid_amount(*won));
        Fields {
            loan_period_years: self
                .loan_period_years
                .filter(|years| (1..=MAX_LOAN_PERIOD_YEARS).contains(years)),
            income_monthly: bounded(self.income_monthly),
            cash_on_hand: bounded(self.cash_on_hand),
            property_price: bounded(self.property_price),
            down_payment: bounded(self.down_payment),
            monthly_debt_payment: bounded(self.monthly_debt_payment),
            ..self.clone()
        }
    }

    /// Whether the slot identified by `key` carries a value.
    ///
    /// `down_payment` is satisfied by cash on hand. Unrecognized keys report `false`.
    pub fn has_slot(&self, key: &str) -> bool {
        use slot_keys::*;
        match key {
            INCOME_MONTHLY => self.income_monthly.is_some(),
            CASH_ON_HAND => self.cash_on_hand.is_some(),
            PROPERTY_PRICE => self.property_price.is_some(),
            DOWN_PAYMENT => self.effective_down_payment().is_some(),
            LOAN_PERIOD_YEARS => self.loan_period_years.is_some(),
            REGION => self.region != Region::Unknown,
            PURPOSE => self.purpose != Purpose::Unknown,
            MARITAL_STATUS => self.marital_status != MaritalStatus::Unknown,
            PROPERTY_TYPE => self.property_type != PropertyType::Unknown,
            HAS_EXISTING_DEBT => self.has_existing_debt.is_some(),
            MONTHLY_DEBT_PAYMENT => self.monthly_debt_payment.is_some(),
            POLICY_MENTION => self.policy_mention.is_some(),
            CREDIT_TIER => self.credit_tier.is_some(),
            FIRST_TIME_BUYER => self.first_time_buyer.is_some(),
            HAS_NEWBORN => self.has_newborn.is_some(),
            HAS_CHILDREN => self.has_children.is_some(),
            _ => false,
        }
    }

    /// True when any numeric money/term slot is present
    pub fn has_numeric_slot(&self) -> bool {
        self.income_monthly.is_some()
            || self.cash_on_hand.is_some()
            || self.property_price.is_some()
            || self.down_payment.is_some()
            || self.loan_period_years.is_some()
            || self.monthly_debt_payment.is_some()
    }

    /// True when no slot at all is known
    pub fn is_empty(&self) -> bool {
        !slot_keys::ALL.iter().any(|k| self.has_slot(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_limits_drops_out_of_range_amounts() {
        let fields = Fields {
            property_price: Some(i64::MAX),
            income_monthly: Some(5_000_000),
            cash_on_hand: Some(-1),
            down_payment: Some(MAX_AMOUNT),
            loan_period_years: Some(u32::MAX),
            region: Region::Regulated,
            ..Default::default()
        };
        let bounded = fields.within_limits();
        assert_eq!(bounded.property_price, None);
        assert_eq!(bounded.cash_on_hand, None);
        assert_eq!(bounded.income_monthly, Some(5_000_000));
        assert_eq!(bounded.down_payment, Some(MAX_AMOUNT));
        assert_eq!(bounded.loan_period_years(), DEFAULT_LOAN_PERIOD_YEARS);
        assert_eq!(bounded.region, Region::Regulated);
    }

    #[test]
    fn test_merge_newer_wins() {
        let old = Fields {
            income_monthly: Some(4_000_000),
            property_price: Some(500_000_000),
            region: Region::Regulated,
            ..Default::default()
        };
        let newer = Fields {
            income_monthly: Some(5_000_000),
            down_payment: Some(100_000_000),
            ..Default::default()
        };

        let merged = old.merge(&newer);
        assert_eq!(merged.income_monthly, Some(5_000_000));
        assert_eq!(merged.property_price, Some(500_000_000));
        assert_eq!(merged.down_payment, Some(100_000_000));
        // Unknown never overwrites a known enum slot
        assert_eq!(merged.region, Region::Regulated);
    }

    #[test]
    fn test_merge_keeps_explicit_zero() {
        let old = Fields {
            income_monthly: Some(3_000_000),
            ..Default::default()
        };
        let newer = Fields {
            income_monthly: Some(0),
            ..Default::default()
        };
        assert_eq!(old.merge(&newer).income_monthly, Some(0));
    }

    #[test]
    fn test_loan_period_default() {
        let fields = Fields::new();
        assert_eq!(fields.loan_period_years(), 30);
        assert!(!fields.has_slot(slot_keys::LOAN_PERIOD_YEARS));

        let fields = Fields {
            loan_period_years: Some(40),
            ..Default::default()
        };
        assert_eq!(fields.loan_period_years(), 40);
    }

    #[test]
    fn test_down_payment_satisfied_by_cash() {
        let fields = Fields {
            cash_on_hand: Some(80_000_000),
            ..Default::default()
        };
        assert!(fields.has_slot(slot_keys::DOWN_PAYMENT));
        assert_eq!(fields.effective_down_payment(), Some(80_000_000));
    }

    #[test]
    fn test_is_empty() {
        assert!(Fields::new().is_empty());
        let fields = Fields {
            marital_status: MaritalStatus::Married,
            ..Default::default()
        };
        assert!(!fields.is_empty());
        assert!(!fields.has_numeric_slot());
    }

    #[test]
    fn test_serde_camel_case() {
        let fields = Fields {
            income_monthly: Some(5_000_000),
            region: Region::NonRegulated,
            ..Default::default()
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["incomeMonthly"], 5_000_000);
        assert_eq!(json["region"], "non_regulated");
        assert!(json.get("downPayment").is_none());

        let back: Fields = serde_json::from_value(json).unwrap();
        assert_eq!(back, fields);
    }
}
