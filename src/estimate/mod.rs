//! VRAM estimation engine
//!
//! [`estimate`] maps a model architecture and run configuration to a
//! [`ResultEstimation`], a per-consumer breakdown of device memory already
//! converted into the requested [`Unit`]. The aggregation methods on the
//! result reduce it to overall or per-GPU totals.
//!
//! The engine is a pure formula evaluator: no I/O, no state, O(1) arithmetic.
//! It does not validate its inputs; callers reject non-positive values via
//! [`ModelConfig::validate`] and [`RunConfig::validate`] before estimating
//! (see [`crate::config`]).

mod activations;

use crate::config::{
    InferencePrecision, ModelConfig, Optimizer, RunConfig, TrainingPrecision,
};
use crate::units::Unit;
use serde::{Deserialize, Serialize};

/// Fixed framework overhead: CUDA context and kernels allocated on first use,
/// typically 300 MiB to 2 GiB. 1000 MiB is the working approximation.
const CUDA_KERNELS_BYTES: f64 = 1000.0 * (1 << 20) as f64;

/// Bytes per element for gradients and optimizer moments, held in full
/// precision regardless of parameter precision.
const FULL_PRECISION_BYTES: f64 = 4.0;

/// Memory breakdown for one estimation, in the unit requested from [`estimate`]
///
/// `cuda_kernels` and `parameters` are always present; the remaining
/// consumers exist only when the run configuration makes them applicable.
/// Absent fields are skipped during serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEstimation {
    /// Framework allocation overhead
    pub cuda_kernels: f64,
    /// Model parameters
    pub parameters: f64,
    /// Output tensor (logits, plus softmax probabilities when training)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<f64>,
    /// Intermediate activations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activations: Option<f64>,
    /// Parameter gradients (training only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradients: Option<f64>,
    /// Optimizer first moments (Adam, or SGD with momentum)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_moments: Option<f64>,
    /// Optimizer second moments (Adam only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_moments: Option<f64>,
}

impl ResultEstimation {
    /// Sum of every present consumer, rounded per the unit rule
    pub fn total_usage(&self, unit: Unit) -> f64 {
        self.total(unit, true)
    }

    /// Per-device total
    ///
    /// The output tensor is materialized on exactly one simulated device (the
    /// one holding the final layer and head), so `outputs` is counted only
    /// when `is_first` is true.
    pub fn total_usage_per_gpu(&self, unit: Unit, is_first: bool) -> f64 {
        self.total(unit, is_first)
    }

    fn total(&self, unit: Unit, include_outputs: bool) -> f64 {
        let outputs = if include_outputs { self.outputs.unwrap_or(0.0) } else { 0.0 };
        unit.round(
            self.cuda_kernels
                + self.parameters
                + outputs
                + self.activations.unwrap_or(0.0)
                + self.gradients.unwrap_or(0.0)
                + self.first_moments.unwrap_or(0.0)
                + self.second_moments.unwrap_or(0.0),
        )
    }
}

/// Estimate the VRAM breakdown for one model and run configuration
///
/// Pure and deterministic: identical inputs yield identical output. Inputs
/// are assumed strictly positive; zero or negative values produce undefined
/// (possibly non-finite) results rather than an error.
pub fn estimate(model: &ModelConfig, run: &RunConfig, unit: Unit) -> ResultEstimation {
    // Mixed-precision training holds parameters redundantly in two widths.
    let bytes_per_param = if run.is_training {
        match run.training_precision {
            TrainingPrecision::Mixed => 6.0,
            TrainingPrecision::Full => 4.0,
        }
    } else {
        match run.inference_precision {
            InferencePrecision::Full => 4.0,
            InferencePrecision::Half => 2.0,
        }
    };

    // Parameters (and training state) are sharded only when the mode's
    // sharding switch is on; naive data parallelism replicates everything.
    let sharded = if run.is_training { run.is_fsdp } else { run.is_inference_model_parallelism };
    let gpu_divisor = if run.num_gpus > 1 && sharded { run.num_gpus as f64 } else { 1.0 };

    let num_params = model.num_params * 1e9;
    let parameters = bytes_per_param * num_params / gpu_divisor;

    // Training stores the softmax probabilities alongside the logits.
    let outputs = 4.0
        * run.batch_size as f64
        * run.sequence_length as f64
        * model.vocab_size as f64
        * if run.is_training { 2.0 } else { 1.0 };

    let activations = activations::activation_bytes(model, run);
    let full_precision_state = FULL_PRECISION_BYTES * num_params / gpu_divisor;

    let has_first_moments = run.is_training
        && (run.optimizer == Optimizer::Adam
            || (run.optimizer == Optimizer::Sgd && run.optimizer_sgd_momentum));
    let has_second_moments = run.is_training && run.optimizer == Optimizer::Adam;

    ResultEstimation {
        cuda_kernels: unit.from_bytes(CUDA_KERNELS_BYTES),
        parameters: unit.from_bytes(parameters),
        outputs: Some(unit.from_bytes(outputs)),
        activations: Some(unit.from_bytes(activations)),
        gradients: run.is_training.then(|| unit.from_bytes(full_precision_state)),
        first_moments: has_first_moments.then(|| unit.from_bytes(full_precision_state)),
        second_moments: has_second_moments.then(|| unit.from_bytes(full_precision_state)),
    }
}
