//! Activation memory sub-calculation
//!
//! Sums the intermediate tensors materialized during one transformer block's
//! forward pass, following the decomposition in Korthikanti et al., "Reducing
//! Activation Recomputation in Large Transformer Models"
//! (arXiv:2205.05198): the attention block, the MLP block, and two layer-norm
//! tensors.
//!
//! Training retains every layer's activations for the backward pass, so the
//! single-layer total is multiplied by the layer count (and sharded across
//! GPUs under FSDP). Inference is charged a single layer: per-layer buffers
//! are assumed freed or reused, so the peak is bounded by one block.

use crate::config::{InferencePrecision, ModelConfig, RunConfig, TrainingPrecision};

/// Bytes of activation memory for the given configuration
pub(crate) fn activation_bytes(model: &ModelConfig, run: &RunConfig) -> f64 {
    // Activations are half-width under mixed-precision training or non-full
    // inference; dropout masks are one byte per element either way.
    let elem = if (run.is_training && run.training_precision == TrainingPrecision::Mixed)
        || (!run.is_training && run.inference_precision != InferencePrecision::Full)
    {
        2.0
    } else {
        4.0
    };

    let batch = run.batch_size as f64;
    let seq = run.sequence_length as f64;
    let hidden = model.hidden_size as f64;
    let heads = model.num_attention_heads as f64;
    let kv_heads = model.num_key_value_heads as f64;
    let intermediate = model.intermediate_size as f64;
    let head_dim = model.head_dim();

    let attention_input = elem * batch * seq * hidden;
    let query = elem * batch * seq * head_dim * heads;
    let key = elem * batch * seq * head_dim * kv_heads;
    let softmax_output = elem * batch * heads * seq * seq;
    let softmax_dropout_mask = batch * heads * seq * seq;
    let dropout_output = elem * batch * heads * seq * seq;
    let value = elem * batch * seq * head_dim * kv_heads;
    let out_proj_input = elem * batch * seq * heads * head_dim;
    let attention_dropout_mask = batch * seq * hidden;
    let attention_block = attention_input
        + query
        + key
        + softmax_output
        + softmax_dropout_mask
        + dropout_output
        + value
        + out_proj_input
        + attention_dropout_mask;

    let mlp_input = elem * batch * seq * hidden;
    let activation_input = elem * batch * seq * intermediate;
    let down_proj_input = elem * batch * seq * intermediate;
    let mlp_dropout_mask = batch * seq * hidden;
    let mlp_block = mlp_input + activation_input + down_proj_input + mlp_dropout_mask;

    let layer_norms = elem * batch * seq * hidden * 2.0;

    let layer = attention_block + mlp_block + layer_norms;

    let total = if run.is_training {
        layer * model.num_layers as f64
    } else {
        layer
    };

    if run.is_training && run.is_fsdp && run.num_gpus > 1 {
        total / run.num_gpus as f64
    } else {
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Optimizer;

    fn tiny_model() -> ModelConfig {
        ModelConfig {
            num_params: 0.001,
            num_layers: 3,
            vocab_size: 16,
            hidden_size: 4,
            intermediate_size: 8,
            num_attention_heads: 2,
            num_key_value_heads: 2,
        }
    }

    fn inference_full() -> RunConfig {
        RunConfig {
            is_training: false,
            inference_precision: InferencePrecision::Full,
            sequence_length: 2,
            batch_size: 1,
            num_gpus: 1,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_single_layer_byte_count() {
        // Hand-computed from the per-tensor decomposition: attention block
        // 240 B, MLP block 168 B, layer norms 64 B.
        let bytes = activation_bytes(&tiny_model(), &inference_full());
        assert!((bytes - 472.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_training_multiplies_by_layers() {
        let run = RunConfig {
            is_training: true,
            training_precision: TrainingPrecision::Full,
            optimizer: Optimizer::Adam,
            sequence_length: 2,
            batch_size: 1,
            num_gpus: 1,
            ..RunConfig::default()
        };
        let bytes = activation_bytes(&tiny_model(), &run);
        assert!((bytes - 472.0 * 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gqa_shrinks_key_value_tensors() {
        let mut model = tiny_model();
        model.num_key_value_heads = 1;
        // Key and value drop from 32 B to 16 B each.
        let bytes = activation_bytes(&model, &inference_full());
        assert!((bytes - 440.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_half_precision_keeps_masks_full() {
        let run = RunConfig {
            inference_precision: InferencePrecision::Half,
            ..inference_full()
        };
        let bytes = activation_bytes(&tiny_model(), &run);
        // Element-width tensors halve (448 -> 224); the 24 B of masks do not.
        assert!((bytes - 248.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fsdp_shards_training_activations() {
        let run = RunConfig {
            is_training: true,
            training_precision: TrainingPrecision::Full,
            sequence_length: 2,
            batch_size: 1,
            num_gpus: 4,
            is_fsdp: true,
            ..RunConfig::default()
        };
        let bytes = activation_bytes(&tiny_model(), &run);
        assert!((bytes - 472.0 * 3.0 / 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inference_ignores_gpu_count() {
        let run = RunConfig { num_gpus: 8, ..inference_full() };
        let sharded = activation_bytes(&tiny_model(), &run);
        let single = activation_bytes(&tiny_model(), &inference_full());
        assert!((sharded - single).abs() < f64::EPSILON);
    }
}
