//! Error types for configuration validation and loading
//!
//! The estimation engine itself never fails for positive inputs; these errors
//! belong to the configuration boundary that feeds it.

use std::path::PathBuf;
use thiserror::Error;

/// Validation error for estimator inputs
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid parameter count: {0} billion (must be finite and > 0)")]
    InvalidNumParams(f64),

    #[error("Invalid {field}: {value} (must be > 0)")]
    NonPositive { field: &'static str, value: usize },

    #[error("Key-value heads ({kv_heads}) exceed attention heads ({attention_heads})")]
    TooManyKeyValueHeads {
        kv_heads: usize,
        attention_heads: usize,
    },
}

/// Errors raised while resolving a model configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported config format: {0} (expected .json, .yaml, or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("Unknown preset: {0} (run `estimar presets` for the catalog)")]
    UnknownPreset(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidNumParams(-1.0);
        assert!(format!("{err}").contains("-1"));

        let err = ValidationError::NonPositive { field: "batch_size", value: 0 };
        assert!(format!("{err}").contains("batch_size"));
        assert!(format!("{err}").contains("must be > 0"));

        let err = ValidationError::TooManyKeyValueHeads { kv_heads: 64, attention_heads: 32 };
        assert!(format!("{err}").contains("64"));
        assert!(format!("{err}").contains("32"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownPreset("llama-99b".to_string());
        assert!(format!("{err}").contains("llama-99b"));

        let err = ConfigError::UnsupportedFormat(PathBuf::from("model.toml"));
        assert!(format!("{err}").contains("model.toml"));
    }

    #[test]
    fn test_config_error_from_validation() {
        let err: ConfigError = ValidationError::InvalidNumParams(0.0).into();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
