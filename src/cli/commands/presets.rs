//! Presets command implementation

use super::LogLevel;
use crate::cli::{OutputFormat, PresetsArgs};
use crate::presets;

pub fn run_presets(args: PresetsArgs, level: LogLevel) -> Result<(), String> {
    let catalog = presets::all();

    match args.format {
        OutputFormat::Text => {
            if level != LogLevel::Quiet {
                println!("Available model presets:");
                println!();
            }
            for preset in &catalog {
                let c = &preset.config;
                println!(
                    "  {:<28} {:>7}B params, {:>2} layers, hidden {:>5}, heads {}/{}",
                    preset.label,
                    c.num_params,
                    c.num_layers,
                    c.hidden_size,
                    c.num_attention_heads,
                    c.num_key_value_heads
                );
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&catalog)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
    }

    Ok(())
}
