//! Korean text normalization and keyword matching
//!
//! Korean users space words inconsistently ("첫 집" / "첫집", "월 소득" / "월소득"), so
//! keyword gates compare whitespace-free lowercase forms.

use crate::amount::normalize_amount_text;

/// Lowercase and strip all whitespace
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// One user message in the forms the matchers need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Lowercased, amount-normalized, single-spaced
    pub normalized: String,
    /// `normalized` without any whitespace
    pub compact: String,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let normalized = normalize_amount_text(text);
        let compact = compact(&normalized);
        Self {
            normalized,
            compact,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.compact.is_empty()
    }

    /// Spacing-insensitive substring test
    pub fn contains(&self, keyword: &str) -> bool {
        let keyword = compact(keyword);
        !keyword.is_empty() && self.compact.contains(&keyword)
    }

    pub fn contains_any<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        keywords.iter().any(|k| self.contains(k.as_ref()))
    }

    /// First keyword of `keywords` present in the text
    pub fn first_match<'a, S: AsRef<str>>(&self, keywords: &'a [S]) -> Option<&'a str> {
        keywords
            .iter()
            .map(AsRef::as_ref)
            .find(|k| self.contains(k))
    }

    /// Every group contributes at least one keyword. Empty `groups` never match.
    pub fn matches_all_groups<S: AsRef<str>>(&self, groups: &[Vec<S>]) -> bool {
        !groups.is_empty() && groups.iter().all(|group| self.contains_any(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact() {
        assert_eq!(compact("첫 집 DSR"), "첫집dsr");
        assert_eq!(compact("  "), "");
    }

    #[test]
    fn test_spacing_insensitive() {
        let text = NormalizedText::new("첫집 취득세 감면 되나요?");
        assert!(text.contains("첫 집"));
        assert!(text.contains("취득세"));
        assert!(!text.contains(""));
    }

    #[test]
    fn test_groups() {
        let text = NormalizedText::new("모델하우스 방문할 때 뭘 챙겨야 해?");
        let groups = vec![
            vec!["모델하우스", "견본주택"],
            vec!["방문", "예약"],
        ];
        assert!(text.matches_all_groups(&groups));

        let partial = NormalizedText::new("모델하우스 어디 있어?");
        assert!(!partial.matches_all_groups(&groups));
        assert!(!partial.matches_all_groups::<&str>(&[]));
    }

    #[test]
    fn test_first_match() {
        let text = NormalizedText::new("DSR이 뭐야");
        assert_eq!(text.first_match(&["ltv", "dsr"]), Some("dsr"));
        assert_eq!(text.normalized, "dsr이 뭐야");
    }
}
