use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use irlens::commands::report_command;
use irlens_core::config::ToolConfig;

/// Compare original source against a reconstruction of its obfuscated LLVM IR.
///
/// Writes one self-contained HTML document with metrics, side-by-side code,
/// detected obfuscation techniques and a per-function complexity table.
#[derive(Parser, Debug)]
#[command(name = "report-tool", version, about = "Obfuscation analysis report generator")]
struct Cli {
    /// Original (unobfuscated) source file.
    original_source: PathBuf,

    /// Obfuscated LLVM IR listing (.ll).
    obfuscated_ir: PathBuf,

    /// Path of the HTML report to write.
    output_html: PathBuf,

    /// Optional JSON/YAML config overriding rendering limits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the metrics snapshot as JSON instead of progress lines.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ToolConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load tool config")?;
    report_command(&cli.original_source, &cli.obfuscated_ir, &cli.output_html, &config, cli.json)
}
