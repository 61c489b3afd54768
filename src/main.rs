//! Estimar CLI
//!
//! Offline VRAM sizing for transformer models.
//!
//! # Usage
//!
//! ```bash
//! # Inference estimate for a preset
//! estimar estimate --preset NousResearch/Llama-2-7b-hf
//!
//! # Training estimate with Adam, mixed precision, 4-way FSDP
//! estimar estimate --preset mistralai/Mistral-7B-v0.1 --train \
//!     --optimizer adam --gpus 4
//!
//! # Custom architecture from a file
//! estimar estimate --config model.yaml --unit MiB --format json
//!
//! # List built-in presets
//! estimar presets
//! ```

use clap::Parser;
use estimar::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
