use thiserror::Error;

/// Top-level error type for the classgraph tools.
#[derive(Error, Debug)]
pub enum ClassgraphError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}
