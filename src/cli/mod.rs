//! CLI argument parsing and command dispatch
//!
//! # Usage
//!
//! ```bash
//! # Inference estimate for a preset, GiB breakdown
//! estimar estimate --preset gpt2-xl --batch-size 8 --seq-len 1024
//!
//! # Training estimate with Adam across 4 GPUs
//! estimar estimate --preset mistralai/Mistral-7B-v0.1 --train \
//!     --optimizer adam --gpus 4 --unit MiB
//!
//! # Custom architecture from a config file, JSON output
//! estimar estimate --config model.yaml --format json
//!
//! # List the preset catalog
//! estimar presets
//! ```

mod commands;

pub use commands::run_command;

use crate::config::{InferencePrecision, Optimizer, TrainingPrecision};
use crate::units::Unit;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Estimar: transformer VRAM estimation
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "estimar")]
#[command(version)]
#[command(about = "Estimate the GPU memory a transformer needs for training or inference")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except totals and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Estimate the VRAM breakdown for a model and run configuration
    Estimate(EstimateArgs),

    /// List the built-in model presets
    Presets(PresetsArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Arguments for the estimate command
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(group(clap::ArgGroup::new("model").required(true).args(["preset", "config"])))]
pub struct EstimateArgs {
    /// Named model preset (see `estimar presets`)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Path to a model config file (.json, .yaml, or .yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Estimate training memory instead of inference
    #[arg(short, long)]
    pub train: bool,

    /// Precision when training
    #[arg(long, value_enum, default_value_t = TrainingPrecision::Mixed)]
    pub training_precision: TrainingPrecision,

    /// Precision when not training
    #[arg(long, value_enum, default_value_t = InferencePrecision::Half)]
    pub inference_precision: InferencePrecision,

    /// Optimizer held in memory when training
    #[arg(short, long, value_enum, default_value_t = Optimizer::Sgd)]
    pub optimizer: Optimizer,

    /// Whether SGD keeps a momentum buffer
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub sgd_momentum: bool,

    /// Sequence length
    #[arg(short, long, default_value_t = 512)]
    pub seq_len: usize,

    /// Per-GPU batch size
    #[arg(short, long, default_value_t = 4)]
    pub batch_size: usize,

    /// Number of GPUs
    #[arg(short, long, default_value_t = 1)]
    pub gpus: usize,

    /// Shard parameters across GPUs with FSDP when training
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub fsdp: bool,

    /// Split layers across GPUs when not training
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub model_parallel: bool,

    /// Reporting unit
    #[arg(short, long, value_enum, default_value_t = Unit::GiB)]
    pub unit: Unit,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the presets command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PresetsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
