//! Acquisition cost estimate for a single-home purchase
//!
//! Statutory tables for a household's first (or only) home:
//!
//! | price           | acquisition tax                 |
//! |-----------------|---------------------------------|
//! | ≤ 6억           | 1%                              |
//! | 6억 – 9억       | (price / 1억 × 2/3 − 3)%        |
//! | > 9억           | 3%                              |
//!
//! Local education tax is 10% of the acquisition tax. First-time buyers get up to
//! 200만원 relief when the price is at most 12억.

use serde::Serialize;

use crate::scenario::group_thousands;

const EOK: i64 = 100_000_000;

/// Maximum first-time-buyer relief in won
pub const FIRST_TIME_RELIEF_CAP: i64 = 2_000_000;
/// Price ceiling for first-time-buyer relief
pub const FIRST_TIME_RELIEF_PRICE_LIMIT: i64 = 1_200_000_000;

/// Brokerage fee brackets for sales: (upper bound exclusive, rate %, cap)
const BROKERAGE_BRACKETS: &[(i64, f64, Option<i64>)] = &[
    (50_000_000, 0.6, Some(250_000)),
    (200_000_000, 0.5, Some(800_000)),
    (900_000_000, 0.4, None),
    (1_200_000_000, 0.5, None),
    (1_500_000_000, 0.6, None),
    (i64::MAX, 0.7, None),
];

/// Acquisition tax rate (percent) for a single-home purchase
pub fn acquisition_tax_rate(price: i64) -> f64 {
    if price <= 6 * EOK {
        1.0
    } else if price <= 9 * EOK {
        price as f64 / EOK as f64 * 2.0 / 3.0 - 3.0
    } else {
        3.0
    }
}

pub fn acquisition_tax(price: i64) -> i64 {
    if price <= 0 {
        return 0;
    }
    (price as f64 * acquisition_tax_rate(price) / 100.0).round() as i64
}

/// Local education tax: 10% of the acquisition tax
pub fn education_tax(acquisition_tax: i64) -> i64 {
    (acquisition_tax as f64 * 0.1).round() as i64
}

/// Statutory maximum brokerage fee for a sale (VAT excluded)
pub fn brokerage_fee(price: i64) -> i64 {
    if price <= 0 {
        return 0;
    }
    let (_, rate, cap) = BROKERAGE_BRACKETS
        .iter()
        .find(|(upper, _, _)| price < *upper)
        .copied()
        .unwrap_or((i64::MAX, 0.7, None));
    let fee = (price as f64 * rate / 100.0).round() as i64;
    cap.map_or(fee, |cap| fee.min(cap))
}

/// First-time-buyer acquisition tax relief
pub fn first_time_relief(price: i64, acquisition_tax: i64) -> i64 {
    if price <= FIRST_TIME_RELIEF_PRICE_LIMIT {
        acquisition_tax.min(FIRST_TIME_RELIEF_CAP)
    } else {
        0
    }
}

/// Itemized purchase costs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionCost {
    pub price: i64,
    pub tax_rate: f64,
    pub acquisition_tax: i64,
    pub education_tax: i64,
    pub brokerage_fee: i64,
    /// First-time-buyer relief, 0 when not applied
    pub relief: i64,
}

impl AcquisitionCost {
    pub fn estimate(price: i64, first_time_buyer: bool) -> Self {
        let acquisition_tax = acquisition_tax(price);
        Self {
            price,
            tax_rate: acquisition_tax_rate(price),
            acquisition_tax,
            education_tax: education_tax(acquisition_tax),
            brokerage_fee: brokerage_fee(price),
            relief: if first_time_buyer {
                first_time_relief(price, acquisition_tax)
            } else {
                0
            },
        }
    }

    pub fn taxes(&self) -> i64 {
        self.acquisition_tax + self.education_tax - self.relief
    }

    pub fn total(&self) -> i64 {
        self.taxes() + self.brokerage_fee
    }

    /// One line per item, for cards and checklists
    pub fn breakdown(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "취득세 {:.2}%: {}원",
                self.tax_rate,
                group_thousands(self.acquisition_tax)
            ),
            format!("지방교육세: {}원", group_thousands(self.education_tax)),
        ];
        if self.relief > 0 {
            lines.push(format!("생애최초 감면: -{}원", group_thousands(self.relief)));
        }
        lines.push(format!(
            "중개보수(상한): {}원",
            group_thousands(self.brokerage_fee)
        ));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_brackets() {
        assert_eq!(acquisition_tax(500_000_000), 5_000_000);
        assert_eq!(acquisition_tax(600_000_000), 6_000_000);
        // 7.5억: 7.5 × 2/3 − 3 = 2%
        assert_eq!(acquisition_tax(750_000_000), 15_000_000);
        assert_eq!(acquisition_tax(1_000_000_000), 30_000_000);
        assert_eq!(acquisition_tax(0), 0);
    }

    #[test]
    fn test_education_tax() {
        assert_eq!(education_tax(5_000_000), 500_000);
    }

    #[test]
    fn test_brokerage_fee() {
        assert_eq!(brokerage_fee(40_000_000), 240_000);
        assert_eq!(brokerage_fee(100_000_000), 500_000);
        // capped at 80만
        assert_eq!(brokerage_fee(190_000_000), 800_000);
        assert_eq!(brokerage_fee(500_000_000), 2_000_000);
        assert_eq!(brokerage_fee(1_000_000_000), 5_000_000);
        assert_eq!(brokerage_fee(2_000_000_000), 14_000_000);
    }

    #[test]
    fn test_first_time_relief() {
        assert_eq!(first_time_relief(500_000_000, 5_000_000), 2_000_000);
        assert_eq!(first_time_relief(150_000_000, 1_500_000), 1_500_000);
        assert_eq!(first_time_relief(1_300_000_000, 39_000_000), 0);
    }

    #[test]
    fn test_estimate() {
        let cost = AcquisitionCost::estimate(500_000_000, true);
        assert_eq!(cost.acquisition_tax, 5_000_000);
        assert_eq!(cost.education_tax, 500_000);
        assert_eq!(cost.relief, 2_000_000);
        assert_eq!(cost.taxes(), 3_500_000);
        assert_eq!(cost.total(), 5_500_000);
        assert_eq!(cost.breakdown().len(), 4);

        let cost = AcquisitionCost::estimate(500_000_000, false);
        assert_eq!(cost.relief, 0);
        assert_eq!(cost.breakdown().len(), 3);
    }
}
