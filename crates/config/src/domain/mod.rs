//! Domain Configuration
//!
//! Typed view of `config/domains/housing/domain.yaml`. Every section is immutable
//! reference data: the engine is built from one validated `MasterDomainConfig` and
//! shares it read-only.

mod appraisal;
mod intents;
mod knowledge;
mod master;
mod topics;
mod vocabulary;

pub use appraisal::{AppraisalConfig, AppraisalStrategy};
pub use intents::{IntentDefinition, SlotLabel};
pub use knowledge::{FaqEntry, GlossaryEntry, KnowledgeConfig};
pub use master::MasterDomainConfig;
pub use topics::{KeywordGroups, TopicRule};
pub use vocabulary::VocabularyConfig;
