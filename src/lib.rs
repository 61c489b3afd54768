//! Estimar: closed-form VRAM estimation for transformer models
//!
//! Estimates the GPU memory a transformer consumes in training or inference
//! from its architecture and run hyperparameters, for offline sizing before
//! provisioning hardware. The estimate is an approximation built from
//! published formulas, not a measurement: it covers framework overhead,
//! parameters, activations, the output tensor, gradients, and optimizer
//! state, with optional multi-GPU sharding (FSDP during training, model
//! parallelism during inference). Fragmentation and allocator behavior are
//! out of scope.
//!
//! The engine is two pure functions: [`estimate`] produces a per-consumer
//! [`ResultEstimation`] in the requested [`Unit`], and the aggregation
//! methods on the result reduce it to overall or per-device totals.
//!
//! # Example
//!
//! ```
//! use estimar::{estimate, ModelConfig, RunConfig, Unit};
//!
//! let model = ModelConfig::llama2_7b();
//! let run = RunConfig {
//!     is_training: false,
//!     batch_size: 8,
//!     sequence_length: 1024,
//!     ..RunConfig::default()
//! };
//!
//! let result = estimate(&model, &run, Unit::GiB);
//! assert!(result.parameters > 0.0);
//! assert!(result.gradients.is_none()); // inference holds no gradients
//!
//! let total = result.total_usage(Unit::GiB);
//! assert!(total > result.parameters);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod estimate;
pub mod presets;
pub mod units;

pub use config::{
    load_model_config, InferencePrecision, ModelConfig, Optimizer, RunConfig, TrainingPrecision,
};
pub use error::{ConfigError, ValidationError};
pub use estimate::{estimate, ResultEstimation};
pub use presets::ModelPreset;
pub use units::Unit;
