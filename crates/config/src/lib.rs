//! Configuration management for the housing advisor
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (HOUSING_ADVISOR_ prefix, `__` separator)
//!
//! # Domain Configuration
//!
//! Reference data lives in `config/domains/housing/domain.yaml`:
//! - calculator constants (rates, LTV caps, DSR limit)
//! - policy program catalog with eligibility rules
//! - glossary, FAQs and keyword-gated topic rules
//! - intent definitions with required slots
//! - appraisal-gap strategies and copyable example inputs
//!
//! The same file is embedded at build time, so `MasterDomainConfig::builtin()` works
//! without filesystem access.

pub mod constants;
pub mod domain;
pub mod settings;

pub use settings::{
    load_settings, EngineConfig, LogFormat, ObservabilityConfig, RuntimeEnvironment, Settings,
};

pub use domain::{
    AppraisalConfig, AppraisalStrategy, FaqEntry, GlossaryEntry, IntentDefinition,
    KnowledgeConfig, MasterDomainConfig, SlotLabel, TopicRule, VocabularyConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
