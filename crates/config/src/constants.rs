//! Centralized constants for the housing advisor
//!
//! Defaults that are not domain data (those live in `domain.yaml`) but are shared by
//! the settings loader, the engine and the CLI.

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "HOUSING_ADVISOR";

/// Separator between nested keys in environment variables
pub const ENV_SEPARATOR: &str = "__";

/// Settings file locations (extension resolved by the `config` crate)
pub mod paths {
    pub const DEFAULT_SETTINGS: &str = "config/default";
    pub const SETTINGS_DIR: &str = "config";
    pub const DOMAIN_FILE: &str = "config/domains/housing/domain.yaml";
}

/// Engine defaults
pub mod engine {
    /// Recent user turns consulted for slot carry-over
    pub const DEFAULT_RECENT_TURN_WINDOW: usize = 6;

    /// Upper bound accepted by validation
    pub const MAX_RECENT_TURN_WINDOW: usize = 50;
}

/// Logging defaults
pub mod observability {
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
}

/// Required number of copyable example inputs in the domain config
pub const EXAMPLE_INPUT_COUNT: usize = 3;
