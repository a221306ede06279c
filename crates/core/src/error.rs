//! Calculator errors

use thiserror::Error;

/// Errors raised by the loan calculators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("Invalid input '{param}': {message}")]
    InvalidInput { param: String, message: String },

    #[error("Missing catalog entry: {0}")]
    CatalogMissing(String),
}

impl CalculatorError {
    pub fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            param: param.into(),
            message: message.into(),
        }
    }
}
