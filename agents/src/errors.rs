use battle_core::ConfigError;
use thiserror::Error;

/// Errors returned through the agent lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Agent has no match in progress; call initialize first")]
    NotInitialized,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Errors that can occur while loading agent or match configuration.
#[derive(Debug, Error)]
pub enum AgentConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
