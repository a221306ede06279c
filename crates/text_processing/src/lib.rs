//! Text Processing for the Housing Advisor
//!
//! This crate turns one Korean message into structured facts:
//! - **Amounts**: "3억2500만원", "500만", "1.5~6억" into whole won
//! - **Slots**: income, price, down payment, term, region, household flags
//! - **Intents**: closed intent set plus the required slots still missing
//! - **Knowledge**: glossary definitions and fixed FAQ answers
//!
//! # Example
//!
//! ```
//! use housing_advisor_text_processing::{parse_amount, SlotExtractor};
//!
//! assert_eq!(parse_amount("3억2500만원"), Some(325_000_000));
//!
//! let fields = SlotExtractor::new().extract("매매 5억, 자기자본 1억, 월소득 500만");
//! assert_eq!(fields.property_price, Some(500_000_000));
//! ```

pub mod amount;
pub mod intent;
pub mod knowledge;
pub mod korean;
pub mod slot_extraction;

pub use amount::{
    contains_amount, format_korean_amount, format_won, parse_amount, parse_amount_range,
    resolve_amount_token, BareUnit,
};
pub use intent::{Classification, IntentClassifier};
pub use knowledge::KnowledgeMatcher;
pub use korean::{compact, NormalizedText};
pub use slot_extraction::SlotExtractor;
