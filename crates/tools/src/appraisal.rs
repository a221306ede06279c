//! Appraisal gap between the requested loan amount and the appraised value

use serde::Serialize;

/// Requested-versus-appraised comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppraisalGap {
    pub requested: i64,
    pub appraised: i64,
    /// `requested − appraised`, 0 when the appraisal covers the request
    pub shortfall: i64,
    /// Gap in basis points of the requested amount, rounded up
    pub gap_bp: i64,
}

impl AppraisalGap {
    /// `None` unless the requested amount is positive and the appraisal is not negative
    pub fn compute(requested: i64, appraised: i64) -> Option<Self> {
        if requested <= 0 || appraised < 0 {
            return None;
        }
        let shortfall = (requested - appraised).max(0);
        // i128 keeps `shortfall × 10_000` exact for any i64 amount
        let numerator = shortfall as i128 * 10_000;
        let denominator = requested as i128;
        let gap_bp = ((numerator + denominator - 1) / denominator) as i64;

        Some(Self {
            requested,
            appraised,
            shortfall,
            gap_bp,
        })
    }

    pub fn gap_percent(&self) -> f64 {
        self.gap_bp as f64 / 100.0
    }

    pub fn has_gap(&self) -> bool {
        self.shortfall > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_percent_gap() {
        let gap = AppraisalGap::compute(400_000_000, 320_000_000).unwrap();
        assert_eq!(gap.shortfall, 80_000_000);
        assert_eq!(gap.gap_bp, 2_000);
        assert_eq!(gap.gap_percent(), 20.0);
    }

    #[test]
    fn test_gap_rounds_up() {
        // 10.0001% must not fall into the ≤10% band
        let gap = AppraisalGap::compute(1_000_000_000, 899_990_000).unwrap();
        assert_eq!(gap.gap_bp, 1_001);
    }

    #[test]
    fn test_no_gap() {
        let gap = AppraisalGap::compute(300_000_000, 350_000_000).unwrap();
        assert!(!gap.has_gap());
        assert_eq!(gap.gap_bp, 0);
        assert!(AppraisalGap::compute(0, 1).is_none());
    }
}
