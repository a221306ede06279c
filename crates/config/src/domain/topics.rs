//! Keyword-gated topic rules
//!
//! Fixed-content answers registered in the handler cascade. A rule fires only when
//! each of its keyword groups is represented in the message.

use serde::{Deserialize, Serialize};

/// Conjunction of disjunctions: every inner list needs one hit
pub type KeywordGroups = Vec<Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRule {
    pub id: String,
    /// Cascade position; lower runs first
    pub priority: u32,
    pub all_of: KeywordGroups,
    pub content: String,
    #[serde(default)]
    pub checklist: Vec<String>,
}
