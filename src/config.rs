//! Model and run configuration
//!
//! [`ModelConfig`] describes a transformer architecture; [`RunConfig`]
//! describes how it is executed (mode, precision, optimizer, parallelism).
//! Both are plain value objects the estimator reads without mutating.
//!
//! The estimator assumes strictly positive fields; [`ModelConfig::validate`]
//! and [`RunConfig::validate`] enforce that at the configuration boundary so
//! degenerate inputs never reach the arithmetic.

use crate::error::{ConfigError, ValidationError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Numeric precision used for inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InferencePrecision {
    /// 32-bit weights and activations
    Full,
    /// 16-bit weights and activations
    #[default]
    Half,
}

/// Numeric precision used for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrainingPrecision {
    /// 32-bit parameters throughout
    Full,
    /// Half-precision working copy alongside a full-precision master copy
    #[default]
    Mixed,
}

/// Optimizer whose state is held in device memory during training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Optimizer {
    /// Adam: first and second moment per parameter
    Adam,
    /// SGD: optional momentum buffer per parameter
    #[default]
    Sgd,
}

impl fmt::Display for InferencePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferencePrecision::Full => write!(f, "full"),
            InferencePrecision::Half => write!(f, "half"),
        }
    }
}

impl fmt::Display for TrainingPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingPrecision::Full => write!(f, "full"),
            TrainingPrecision::Mixed => write!(f, "mixed"),
        }
    }
}

impl fmt::Display for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optimizer::Adam => write!(f, "adam"),
            Optimizer::Sgd => write!(f, "sgd"),
        }
    }
}

/// Static architectural description of a transformer model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Total parameter count in billions
    pub num_params: f64,
    /// Number of transformer blocks
    pub num_layers: usize,
    /// Vocabulary size
    pub vocab_size: usize,
    /// Hidden dimension (embedding size)
    pub hidden_size: usize,
    /// Feed-forward intermediate dimension
    pub intermediate_size: usize,
    /// Number of attention heads
    pub num_attention_heads: usize,
    /// Number of key-value heads (fewer than attention heads under GQA)
    pub num_key_value_heads: usize,
}

impl ModelConfig {
    /// Per-head dimension, applied uniformly to query and key-value heads
    pub fn head_dim(&self) -> f64 {
        self.hidden_size as f64 / self.num_attention_heads as f64
    }

    /// Reject non-positive fields and key-value heads exceeding attention heads
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.num_params.is_finite() || self.num_params <= 0.0 {
            return Err(ValidationError::InvalidNumParams(self.num_params));
        }
        for (field, value) in [
            ("num_layers", self.num_layers),
            ("vocab_size", self.vocab_size),
            ("hidden_size", self.hidden_size),
            ("intermediate_size", self.intermediate_size),
            ("num_attention_heads", self.num_attention_heads),
            ("num_key_value_heads", self.num_key_value_heads),
        ] {
            if value == 0 {
                return Err(ValidationError::NonPositive { field, value });
            }
        }
        if self.num_key_value_heads > self.num_attention_heads {
            return Err(ValidationError::TooManyKeyValueHeads {
                kv_heads: self.num_key_value_heads,
                attention_heads: self.num_attention_heads,
            });
        }
        Ok(())
    }

    /// LLaMA 2 70B configuration
    pub fn llama2_70b() -> Self {
        Self {
            num_params: 70.0,
            num_layers: 80,
            vocab_size: 32000,
            hidden_size: 8192,
            intermediate_size: 28672,
            num_attention_heads: 64,
            num_key_value_heads: 8, // Grouped-query attention
        }
    }

    /// LLaMA 2 13B configuration
    pub fn llama2_13b() -> Self {
        Self {
            num_params: 13.058,
            num_layers: 40,
            vocab_size: 32000,
            hidden_size: 5120,
            intermediate_size: 13824,
            num_attention_heads: 40,
            num_key_value_heads: 40,
        }
    }

    /// LLaMA 2 7B configuration
    pub fn llama2_7b() -> Self {
        Self {
            num_params: 6.772,
            num_layers: 32,
            vocab_size: 32000,
            hidden_size: 4096,
            intermediate_size: 11008,
            num_attention_heads: 32,
            num_key_value_heads: 32,
        }
    }

    /// Mistral 7B configuration
    pub fn mistral_7b() -> Self {
        Self {
            num_params: 7.51,
            num_layers: 32,
            vocab_size: 32000,
            hidden_size: 4096,
            intermediate_size: 14336,
            num_attention_heads: 32,
            num_key_value_heads: 8, // Grouped-query attention
        }
    }

    /// Phi-2 configuration
    pub fn phi_2() -> Self {
        Self {
            num_params: 2.78,
            num_layers: 32,
            vocab_size: 51200,
            hidden_size: 2560,
            intermediate_size: 4 * 2560,
            num_attention_heads: 32,
            num_key_value_heads: 32,
        }
    }

    /// Phi-1.5 configuration
    pub fn phi_1_5() -> Self {
        Self {
            num_params: 1.418,
            num_layers: 24,
            vocab_size: 51200,
            hidden_size: 2048,
            intermediate_size: 4 * 2048,
            num_attention_heads: 32,
            num_key_value_heads: 32,
        }
    }

    /// GPT-2 XL configuration
    pub fn gpt2_xl() -> Self {
        Self {
            num_params: 1.608,
            num_layers: 48,
            vocab_size: 50257,
            hidden_size: 1600,
            intermediate_size: 4 * 1600,
            num_attention_heads: 25,
            num_key_value_heads: 25,
        }
    }

    /// GPT-2 Large configuration
    pub fn gpt2_large() -> Self {
        Self {
            num_params: 0.812,
            num_layers: 36,
            vocab_size: 50257,
            hidden_size: 1280,
            intermediate_size: 4 * 1280,
            num_attention_heads: 20,
            num_key_value_heads: 20,
        }
    }

    /// GPT-2 Medium configuration
    pub fn gpt2_medium() -> Self {
        Self {
            num_params: 0.38,
            num_layers: 24,
            vocab_size: 50257,
            hidden_size: 1024,
            intermediate_size: 4 * 1024,
            num_attention_heads: 16,
            num_key_value_heads: 16,
        }
    }

    /// GPT-2 configuration
    pub fn gpt2() -> Self {
        Self {
            num_params: 0.137,
            num_layers: 12,
            vocab_size: 50257,
            hidden_size: 768,
            intermediate_size: 4 * 768,
            num_attention_heads: 12,
            num_key_value_heads: 12,
        }
    }
}

/// How the model is being executed
///
/// Precision fields are mode-scoped: only the one matching `is_training` is
/// read, the other is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Training mode (gradients, optimizer state, retained activations)
    pub is_training: bool,
    /// Precision used when not training
    pub inference_precision: InferencePrecision,
    /// Precision used when training
    pub training_precision: TrainingPrecision,
    /// Optimizer held in memory when training
    pub optimizer: Optimizer,
    /// Whether SGD keeps a momentum buffer
    pub optimizer_sgd_momentum: bool,
    /// Sequence length
    pub sequence_length: usize,
    /// Per-device batch size
    pub batch_size: usize,
    /// Number of simulated devices
    pub num_gpus: usize,
    /// Shard parameters, gradients, and optimizer state across GPUs (training)
    pub is_fsdp: bool,
    /// Split layers across GPUs (inference)
    pub is_inference_model_parallelism: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            is_training: true,
            inference_precision: InferencePrecision::Half,
            training_precision: TrainingPrecision::Mixed,
            optimizer: Optimizer::Sgd,
            optimizer_sgd_momentum: true,
            sequence_length: 512,
            batch_size: 4,
            num_gpus: 1,
            is_fsdp: true,
            is_inference_model_parallelism: true,
        }
    }
}

impl RunConfig {
    /// Reject non-positive batch, sequence, and device counts
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("sequence_length", self.sequence_length),
            ("batch_size", self.batch_size),
            ("num_gpus", self.num_gpus),
        ] {
            if value == 0 {
                return Err(ValidationError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

/// Load and validate a model configuration from a JSON or YAML file
pub fn load_model_config(path: &Path) -> Result<ModelConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: ModelConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })?,
        Some("yaml" | "yml") => serde_yaml::from_str(&text).map_err(|e| ConfigError::Yaml {
            path: path.to_path_buf(),
            source: e,
        })?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_head_dim() {
        let config = ModelConfig::llama2_7b();
        assert!((config.head_dim() - 128.0).abs() < f64::EPSILON);

        let config = ModelConfig::gpt2_xl();
        assert!((config.head_dim() - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grouped_query_attention_presets() {
        let config = ModelConfig::mistral_7b();
        assert_eq!(config.num_key_value_heads, 8);
        assert_eq!(config.num_attention_heads, 32);

        let config = ModelConfig::llama2_70b();
        assert_eq!(config.num_key_value_heads, 8);
        assert_eq!(config.num_attention_heads, 64);
    }

    #[test]
    fn test_all_presets_validate() {
        for config in [
            ModelConfig::llama2_70b(),
            ModelConfig::llama2_13b(),
            ModelConfig::llama2_7b(),
            ModelConfig::mistral_7b(),
            ModelConfig::phi_2(),
            ModelConfig::phi_1_5(),
            ModelConfig::gpt2_xl(),
            ModelConfig::gpt2_large(),
            ModelConfig::gpt2_medium(),
            ModelConfig::gpt2(),
        ] {
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_zero_field() {
        let mut config = ModelConfig::gpt2();
        config.hidden_size = 0;
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("hidden_size"));
    }

    #[test]
    fn test_validate_rejects_bad_num_params() {
        let mut config = ModelConfig::gpt2();
        config.num_params = 0.0;
        assert!(config.validate().is_err());

        config.num_params = f64::NAN;
        assert!(config.validate().is_err());

        config.num_params = -1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_kv_heads_over_attention_heads() {
        let mut config = ModelConfig::mistral_7b();
        config.num_key_value_heads = 64;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::TooManyKeyValueHeads { .. }));
    }

    #[test]
    fn test_run_config_default() {
        let run = RunConfig::default();
        assert!(run.is_training);
        assert_eq!(run.training_precision, TrainingPrecision::Mixed);
        assert_eq!(run.optimizer, Optimizer::Sgd);
        assert!(run.optimizer_sgd_momentum);
        assert_eq!(run.sequence_length, 512);
        assert_eq!(run.batch_size, 4);
        assert_eq!(run.num_gpus, 1);
        run.validate().unwrap();
    }

    #[test]
    fn test_run_config_validate_rejects_zero_gpus() {
        let run = RunConfig { num_gpus: 0, ..RunConfig::default() };
        let err = run.validate().unwrap_err();
        assert!(format!("{err}").contains("num_gpus"));
    }

    #[test]
    fn test_model_config_json_round_trip() {
        let config = ModelConfig::mistral_7b();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_model_config_yaml_round_trip() {
        let config = ModelConfig::llama2_13b();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let restored: ModelConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_run_config_partial_yaml_uses_defaults() {
        let run: RunConfig = serde_yaml::from_str("is_training: false\nbatch_size: 8\n").unwrap();
        assert!(!run.is_training);
        assert_eq!(run.batch_size, 8);
        assert_eq!(run.sequence_length, 512);
    }

    #[test]
    fn test_load_model_config_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let json = serde_json::to_string(&ModelConfig::gpt2()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = load_model_config(file.path()).unwrap();
        assert_eq!(loaded, ModelConfig::gpt2());
    }

    #[test]
    fn test_load_model_config_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let yaml = serde_yaml::to_string(&ModelConfig::phi_2()).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = load_model_config(file.path()).unwrap();
        assert_eq!(loaded, ModelConfig::phi_2());
    }

    #[test]
    fn test_load_model_config_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = load_model_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_model_config_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let mut config = ModelConfig::gpt2();
        config.num_layers = 0;
        let json = serde_json::to_string(&config).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let err = load_model_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_precision_display() {
        assert_eq!(InferencePrecision::Half.to_string(), "half");
        assert_eq!(TrainingPrecision::Mixed.to_string(), "mixed");
        assert_eq!(Optimizer::Adam.to_string(), "adam");
    }
}
