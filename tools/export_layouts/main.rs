//! Export keyboard layout sets to JSON or TOML format
//!
//! Usage:
//!   cargo run -p export_layouts -- --preset qwerty --format json
//!   cargo run -p export_layouts -- --input layouts.json --format toml --output layouts.toml
//!   cargo run -p export_layouts -- --preset azerty --layout numbers

use clap::Parser;
use std::path::PathBuf;
use vkeyboard::{preset_by_name, LayoutKind, LayoutSet, PRESET_NAMES};

#[derive(Parser, Debug)]
#[command(name = "export_layouts")]
#[command(about = "Export keyboard layout sets to JSON or TOML format")]
struct Args {
    /// Built-in preset to export
    #[arg(short, long, default_value = "qwerty", conflicts_with = "input")]
    preset: String,

    /// Layout file (TOML or JSON, by extension) to convert instead of a preset
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format: json or toml
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Export a single layout (alpha, shift, caps, numbers, symbols)
    #[arg(short, long)]
    layout: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print rows and slots per row needed to show every layout
    #[arg(long)]
    grid: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let set = match &args.input {
        Some(path) => LayoutSet::load(path)?,
        None => preset_by_name(&args.preset).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown preset: {}. Available: {}",
                args.preset,
                PRESET_NAMES.join(", ")
            )
        })?,
    };

    if args.grid {
        eprintln!("slot grid: {:?}", set.slot_grid());
    }

    let output = match &args.layout {
        Some(name) => {
            let kind = parse_kind(name)?;
            export_layout(&set, kind, &args.format)?
        }
        None => match args.format.as_str() {
            "json" => set.to_json_string()?,
            "toml" => set.to_toml_string()?,
            _ => anyhow::bail!("Unsupported format: {}. Use 'json' or 'toml'", args.format),
        },
    };

    if let Some(path) = args.output {
        std::fs::write(path, output)?;
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn parse_kind(name: &str) -> anyhow::Result<LayoutKind> {
    LayoutKind::ALL
        .into_iter()
        .find(|k| k.as_str() == name.to_ascii_lowercase())
        .ok_or_else(|| anyhow::anyhow!("Unknown layout: {}", name))
}

fn export_layout(set: &LayoutSet, kind: LayoutKind, format: &str) -> anyhow::Result<String> {
    let layout = set.get(kind);
    let text = match format {
        "json" => serde_json::to_string_pretty(layout)?,
        "toml" => toml::to_string_pretty(layout)?,
        _ => anyhow::bail!("Unsupported format: {}. Use 'json' or 'toml'", format),
    };
    Ok(text)
}
