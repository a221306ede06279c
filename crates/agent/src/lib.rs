//! Housing Finance Advisor Engine
//!
//! Features:
//! - Priority-ordered handler cascade (glossary, scenarios, tax, policy, topics, ...)
//! - Response composition with a one-line missing-info prompt
//! - Slot carry-over from recent user turns
//! - Deterministic routing: the same message and profile always yield the same response
//!
//! # Example
//!
//! ```
//! use housing_advisor_agent::AdvisorAgent;
//! use housing_advisor_core::Fields;
//!
//! let agent = AdvisorAgent::with_builtin().unwrap();
//! let response = agent.route("전세 3억", &Fields::default(), &[]);
//! assert!(response.content.contains("₩900,000"));
//! ```

pub mod agent;
pub mod composer;
pub mod context;
pub mod handlers;
pub mod request;

pub use agent::AdvisorAgent;
pub use composer::ResponseComposer;
pub use context::RouteContext;
pub use handlers::{Handler, HandlerRegistry};
pub use request::RouteRequest;

use thiserror::Error;

use housing_advisor_config::ConfigError;

/// Agent errors
///
/// Routing itself never fails; these surface while building the engine or decoding
/// a request.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Handler registry error: {0}")]
    Registry(String),

    #[error("Invalid request: {0}")]
    Request(#[from] serde_json::Error),
}
