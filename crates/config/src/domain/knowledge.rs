//! Glossary and FAQ configuration

use serde::{Deserialize, Serialize};

use super::topics::KeywordGroups;

/// Fixed-answer knowledge base
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Phrases that turn a term mention into a definition request ("뭐야", "뜻")
    #[serde(default)]
    pub definition_markers: Vec<String>,
    #[serde(default)]
    pub glossary: Vec<GlossaryEntry>,
    #[serde(default)]
    pub faqs: Vec<FaqEntry>,
}

impl KnowledgeConfig {
    /// Every glossary surface form, term first then aliases
    pub fn glossary_terms(&self) -> impl Iterator<Item = &str> {
        self.glossary.iter().flat_map(|entry| entry.names())
    }
}

/// Financial term with a fixed definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub definition: String,
}

impl GlossaryEntry {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.term.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Frequently asked question answered verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    /// Every group must contribute at least one keyword
    pub all_of: KeywordGroups,
    pub content: String,
    #[serde(default)]
    pub checklist: Vec<String>,
}
