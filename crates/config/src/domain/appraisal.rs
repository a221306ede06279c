//! Appraisal-gap remediation strategies

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppraisalConfig {
    /// Ordered by ascending `max_gap_percent`; the last band is open-ended
    #[serde(default)]
    pub strategies: Vec<AppraisalStrategy>,
}

impl AppraisalConfig {
    /// Strategy for a gap expressed in basis points (2000 = 20%)
    pub fn strategy_for_gap_bp(&self, gap_bp: i64) -> Option<&AppraisalStrategy> {
        self.strategies.iter().find(|s| match s.max_gap_percent {
            Some(max) => gap_bp <= i64::from(max) * 100,
            None => true,
        })
    }
}

/// One remediation band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppraisalStrategy {
    /// Inclusive upper bound of the band; `None` for the last band
    #[serde(default)]
    pub max_gap_percent: Option<u32>,
    /// Short band label ("10% 초과 20% 이하")
    pub label: String,
    pub content: String,
    #[serde(default)]
    pub checklist: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(max: Option<u32>, label: &str) -> AppraisalStrategy {
        AppraisalStrategy {
            max_gap_percent: max,
            label: label.to_string(),
            content: String::new(),
            checklist: vec![],
        }
    }

    #[test]
    fn test_band_boundaries() {
        let config = AppraisalConfig {
            strategies: vec![
                strategy(Some(10), "small"),
                strategy(Some(20), "medium"),
                strategy(None, "large"),
            ],
        };
        assert_eq!(config.strategy_for_gap_bp(0).unwrap().label, "small");
        assert_eq!(config.strategy_for_gap_bp(1000).unwrap().label, "small");
        assert_eq!(config.strategy_for_gap_bp(1001).unwrap().label, "medium");
        assert_eq!(config.strategy_for_gap_bp(2000).unwrap().label, "medium");
        assert_eq!(config.strategy_for_gap_bp(2001).unwrap().label, "large");
    }
}
