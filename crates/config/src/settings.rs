//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{self, engine, observability, paths};
use crate::{ConfigError, MasterDomainConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Relaxed validation
    #[default]
    Development,
    Staging,
    /// All validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Path to a domain YAML file; the embedded catalog is used when absent
    #[serde(default)]
    pub domain_config_path: Option<String>,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Routing engine behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Append the one-line missing-info prompt to non-high-confidence answers
    #[serde(default = "default_true")]
    pub append_missing_prompt: bool,

    /// How many recent user turns feed slot carry-over
    #[serde(default = "default_recent_turn_window")]
    pub recent_turn_window: usize,
}

fn default_true() -> bool {
    true
}

fn default_recent_turn_window() -> usize {
    engine::DEFAULT_RECENT_TURN_WINDOW
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            append_missing_prompt: true,
            recent_turn_window: default_recent_turn_window(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    observability::DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_engine()?;
        self.validate_observability()?;
        self.validate_domain_path()?;
        Ok(())
    }

    fn validate_engine(&self) -> Result<(), ConfigError> {
        if self.engine.recent_turn_window > engine::MAX_RECENT_TURN_WINDOW {
            return Err(ConfigError::invalid(
                "engine.recent_turn_window",
                format!(
                    "Must be at most {}, got {}",
                    engine::MAX_RECENT_TURN_WINDOW,
                    self.engine.recent_turn_window
                ),
            ));
        }
        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        let level = self.observability.log_level.to_lowercase();
        if !observability::LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(
                "observability.log_level",
                format!(
                    "Unknown level '{}', expected one of {:?}",
                    self.observability.log_level,
                    observability::LOG_LEVELS
                ),
            ));
        }
        Ok(())
    }

    fn validate_domain_path(&self) -> Result<(), ConfigError> {
        match &self.domain_config_path {
            Some(path) if path.trim().is_empty() => Err(ConfigError::invalid(
                "domain_config_path",
                "Path is empty; omit the key to use the built-in catalog",
            )),
            Some(path) if !Path::new(path).exists() => {
                if self.environment.is_strict() {
                    Err(ConfigError::FileNotFound(path.clone()))
                } else {
                    tracing::warn!(
                        path = %path,
                        "Domain config path does not exist, loading will fail"
                    );
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Load the domain configuration these settings point at
    pub fn load_domain(&self) -> Result<MasterDomainConfig, ConfigError> {
        match &self.domain_config_path {
            Some(path) => MasterDomainConfig::load(path),
            None => MasterDomainConfig::builtin(),
        }
    }
}

/// Load settings from files and environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name(paths::DEFAULT_SETTINGS).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(
            File::with_name(&format!("{}/{}", paths::SETTINGS_DIR, env_name)).required(false),
        );
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix(constants::ENV_PREFIX)
            .separator(constants::ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = ?settings.environment,
        domain = settings.domain_config_path.as_deref().unwrap_or("builtin"),
        "Loaded settings"
    );

    Ok(settings)
}
