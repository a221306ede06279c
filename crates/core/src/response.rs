//! Response contract
//!
//! Every handler returns the same shape: free text, optional summary cards, optional
//! checklist. Optional arrays are either absent or non-empty; the builder enforces that
//! so no call site can hand back `cards: []`.

use serde::{Deserialize, Serialize};

/// How much the answer relies on assumptions
///
/// - `High`: a specific rule fired and nothing required was missing
/// - `Medium`: assumption-based estimate
/// - `Low`: terminal fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// Summary card shown next to the prose answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Monthly payment in won
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_interest: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            monthly: None,
            total_interest: None,
            notes: None,
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn monthly(mut self, monthly: i64) -> Self {
        self.monthly = Some(monthly);
        self
    }

    pub fn total_interest(mut self, total_interest: i64) -> Self {
        self.total_interest = Some(total_interest);
        self
    }

    /// Set notes; an empty list leaves the field absent
    pub fn notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let notes: Vec<String> = notes.into_iter().map(Into::into).collect();
        self.notes = if notes.is_empty() { None } else { Some(notes) };
        self
    }
}

/// The single response contract returned by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<String>>,
    pub confidence: Confidence,
    /// Id of the rule that produced the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

impl Response {
    pub fn builder(content: impl Into<String>) -> ResponseBuilder {
        ResponseBuilder::new(content)
    }

    pub fn card_count(&self) -> usize {
        self.cards.as_ref().map_or(0, Vec::len)
    }

    pub fn checklist_len(&self) -> usize {
        self.checklist.as_ref().map_or(0, Vec::len)
    }
}

/// Builder that upholds the non-empty invariants of [`Response`]
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    content: String,
    cards: Vec<Card>,
    checklist: Vec<String>,
    confidence: Confidence,
    handler: Option<String>,
}

impl ResponseBuilder {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            cards: Vec::new(),
            checklist: Vec::new(),
            confidence: Confidence::default(),
            handler: None,
        }
    }

    pub fn card(mut self, card: Card) -> Self {
        self.cards.push(card);
        self
    }

    pub fn cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.cards.extend(cards);
        self
    }

    pub fn checklist_item(mut self, item: impl Into<String>) -> Self {
        self.checklist.push(item.into());
        self
    }

    pub fn checklist<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checklist.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    pub fn build(self) -> Response {
        let checklist: Vec<String> = self
            .checklist
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();

        Response {
            content: self.content.trim().to_string(),
            cards: if self.cards.is_empty() {
                None
            } else {
                Some(self.cards)
            },
            checklist: if checklist.is_empty() {
                None
            } else {
                Some(checklist)
            },
            confidence: self.confidence,
            handler: self.handler,
        }
    }
}
