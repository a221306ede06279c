//! Route request payload

use serde::{Deserialize, Serialize};

use housing_advisor_core::{Fields, Turn};

use crate::AgentError;

/// One call to [`crate::AdvisorAgent::route`], as callers serialize it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub message: String,
    /// Facts the caller has accumulated over earlier turns
    #[serde(default)]
    pub profile: Fields,
    #[serde(default)]
    pub recent_turns: Vec<Turn>,
}

impl RouteRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AgentError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_advisor_core::TurnRole;

    #[test]
    fn test_minimal_request() {
        let request = RouteRequest::from_json(r#"{"message": "전세 3억"}"#).unwrap();
        assert_eq!(request.message, "전세 3억");
        assert!(request.profile.is_empty());
        assert!(request.recent_turns.is_empty());
    }

    #[test]
    fn test_full_request() {
        let json = r#"{
            "message": "얼마나 빌릴 수 있어?",
            "profile": {"incomeMonthly": 5000000, "region": "non_regulated"},
            "recentTurns": [{"role": "user", "content": "매매 5억"}]
        }"#;
        let request = RouteRequest::from_json(json).unwrap();
        assert_eq!(request.profile.income_monthly, Some(5_000_000));
        assert_eq!(request.recent_turns.len(), 1);
        assert_eq!(request.recent_turns[0].role, TurnRole::User);
    }

    #[test]
    fn test_rejects_missing_message() {
        assert!(matches!(
            RouteRequest::from_json(r#"{"profile": {}}"#),
            Err(AgentError::Request(_))
        ));
    }
}
