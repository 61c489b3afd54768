//! Estimate command implementation

use super::LogLevel;
use crate::cli::{EstimateArgs, OutputFormat};
use crate::config::{load_model_config, ModelConfig, RunConfig};
use crate::estimate::{estimate, ResultEstimation};
use crate::presets;
use crate::units::Unit;
use serde::Serialize;

/// JSON payload for `--format json`
#[derive(Serialize)]
struct EstimateReport<'a> {
    unit: Unit,
    estimation: &'a ResultEstimation,
    total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_first_gpu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_other_gpus: Option<f64>,
}

pub fn run_estimate(args: EstimateArgs, level: LogLevel) -> Result<(), String> {
    let model = resolve_model(&args)?;
    model.validate().map_err(|e| e.to_string())?;

    let run = RunConfig {
        is_training: args.train,
        inference_precision: args.inference_precision,
        training_precision: args.training_precision,
        optimizer: args.optimizer,
        optimizer_sgd_momentum: args.sgd_momentum,
        sequence_length: args.seq_len,
        batch_size: args.batch_size,
        num_gpus: args.gpus,
        is_fsdp: args.fsdp,
        is_inference_model_parallelism: args.model_parallel,
    };
    run.validate().map_err(|e| e.to_string())?;

    let result = estimate(&model, &run, args.unit);

    match args.format {
        OutputFormat::Text => print_text(&model, &run, &result, args.unit, level),
        OutputFormat::Json => print_json(&result, &run, args.unit)?,
    }

    Ok(())
}

fn resolve_model(args: &EstimateArgs) -> Result<ModelConfig, String> {
    if let Some(label) = &args.preset {
        presets::find(label)
            .ok_or_else(|| crate::error::ConfigError::UnknownPreset(label.clone()).to_string())
    } else if let Some(path) = &args.config {
        load_model_config(path).map_err(|e| e.to_string())
    } else {
        // clap's arg group guarantees one source is present
        Err("No model source given: use --preset or --config".to_string())
    }
}

fn print_text(
    model: &ModelConfig,
    run: &RunConfig,
    result: &ResultEstimation,
    unit: Unit,
    level: LogLevel,
) {
    if level == LogLevel::Verbose {
        println!("Model:");
        println!("  Parameters:        {}B", model.num_params);
        println!("  Layers:            {}", model.num_layers);
        println!("  Hidden size:       {}", model.hidden_size);
        println!("  Intermediate size: {}", model.intermediate_size);
        println!("  Vocab size:        {}", model.vocab_size);
        println!(
            "  Heads:             {} attention / {} key-value",
            model.num_attention_heads, model.num_key_value_heads
        );
        println!();
    }

    if level != LogLevel::Quiet {
        if run.is_training {
            println!(
                "Training estimate ({} precision, {} optimizer)",
                run.training_precision, run.optimizer
            );
        } else {
            println!("Inference estimate ({} precision)", run.inference_precision);
        }
        println!();
        print_row("CUDA kernels", Some(result.cuda_kernels), unit);
        print_row("Parameters", Some(result.parameters), unit);
        print_row("Activations", result.activations, unit);
        print_row("Outputs", result.outputs, unit);
        print_row("Gradients", result.gradients, unit);
        print_row("First moments", result.first_moments, unit);
        print_row("Second moments", result.second_moments, unit);
        println!();
    }

    if run.num_gpus > 1 {
        println!(
            "Total (GPU 0):    {} {unit}",
            result.total_usage_per_gpu(unit, true)
        );
        println!(
            "Total (GPU 1-{}): {} {unit}",
            run.num_gpus - 1,
            result.total_usage_per_gpu(unit, false)
        );
    } else {
        println!("Total: {} {unit}", result.total_usage(unit));
    }
}

fn print_row(label: &str, value: Option<f64>, unit: Unit) {
    if let Some(v) = value {
        println!("  {label:<15} {v:>12} {unit}");
    }
}

fn print_json(result: &ResultEstimation, run: &RunConfig, unit: Unit) -> Result<(), String> {
    let multi_gpu = run.num_gpus > 1;
    let report = EstimateReport {
        unit,
        estimation: result,
        total: result.total_usage(unit),
        total_first_gpu: multi_gpu.then(|| result.total_usage_per_gpu(unit, true)),
        total_other_gpus: multi_gpu.then(|| result.total_usage_per_gpu(unit, false)),
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("JSON serialization error: {e}"))?;
    println!("{json}");
    Ok(())
}
