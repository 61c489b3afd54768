//! Labeled model preset catalog
//!
//! Pairs the named constructors on [`ModelConfig`] with the human-readable
//! labels callers select from (HuggingFace repository names where they exist).

use crate::config::ModelConfig;
use serde::Serialize;

/// A named model configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelPreset {
    /// Human-readable label
    pub label: &'static str,
    /// Architecture description
    pub config: ModelConfig,
}

/// The full preset catalog, largest first
pub fn all() -> Vec<ModelPreset> {
    vec![
        ModelPreset { label: "NousResearch/Llama-2-70b-hf", config: ModelConfig::llama2_70b() },
        ModelPreset { label: "NousResearch/Llama-2-13b-hf", config: ModelConfig::llama2_13b() },
        ModelPreset { label: "NousResearch/Llama-2-7b-hf", config: ModelConfig::llama2_7b() },
        ModelPreset { label: "mistralai/Mistral-7B-v0.1", config: ModelConfig::mistral_7b() },
        ModelPreset { label: "microsoft/phi-2", config: ModelConfig::phi_2() },
        ModelPreset { label: "microsoft/phi-1_5", config: ModelConfig::phi_1_5() },
        ModelPreset { label: "gpt2-xl", config: ModelConfig::gpt2_xl() },
        ModelPreset { label: "gpt2-large", config: ModelConfig::gpt2_large() },
        ModelPreset { label: "gpt2-medium", config: ModelConfig::gpt2_medium() },
        ModelPreset { label: "gpt2", config: ModelConfig::gpt2() },
    ]
}

/// Look up a preset by label, case-insensitively
pub fn find(label: &str) -> Option<ModelConfig> {
    all()
        .into_iter()
        .find(|p| p.label.eq_ignore_ascii_case(label))
        .map(|p| p.config)
}
