use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use irlens::commands::convert_command;
use irlens_core::config::ToolConfig;

/// Convert an obfuscated LLVM IR listing into approximate C-like source.
#[derive(Parser, Debug)]
#[command(name = "ir-to-source-tool", version, about = "LLVM IR to C-like source converter")]
struct Cli {
    /// LLVM IR listing (.ll) to convert.
    input_ir: PathBuf,

    /// Path of the C-like source file to write.
    output_source: PathBuf,

    /// Optional JSON/YAML config overriding rendering limits.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ToolConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load tool config")?;
    convert_command(&cli.input_ir, &cli.output_source, &config)
}
