//! Error types for the risk analytics engine
//!
//! Calculations degrade to zero-valued results instead of failing. These
//! errors cover the few things that are reported: bad configuration, a
//! malformed scenario catalogue, and paired series the caller asked us to
//! check strictly.

use thiserror::Error;

/// Errors that can occur while configuring or validating the engine
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid confidence level: {0} (must be between 0 and 1)")]
    InvalidConfidenceLevel(f64),

    #[error("Paired series have different lengths: {left} vs {right}")]
    MismatchedSeries { left: usize, right: usize },

    #[error("Invalid stress scenario: {0}")]
    InvalidScenario(String),

    #[error("Failed to parse YAML: {0}")]
    Yaml(String),

    #[error("Failed to parse JSON: {0}")]
    Json(String),
}

impl From<serde_yaml::Error> for RiskError {
    fn from(err: serde_yaml::Error) -> Self {
        RiskError::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(err: serde_json::Error) -> Self {
        RiskError::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;
