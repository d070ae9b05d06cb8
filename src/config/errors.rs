//! Error types for configuration loading

use std::path::PathBuf;

/// Error types for configuration and pattern-file loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable or builder value could not be used
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Pattern file could not be read
    #[error("Failed to read reduction patterns from {}: {source}", path.display())]
    PatternsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pattern file is not valid JSON for `ReductionPatterns`
    #[error("Invalid reduction patterns JSON: {0}")]
    PatternsJson(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
