use std::path::Path;

use anyhow::Result;
use irlens_core::analysis::{analyze, Analysis};
use irlens_core::config::{LoweringConfig, ToolConfig};
use irlens_core::decompile::{decompile_function, escape_c_literal};

use crate::{read_text_input, write_output};

/// Convert an IR listing into a standalone C-like source file.
pub fn convert_command(input_path: &Path, output_path: &Path, config: &ToolConfig) -> Result<()> {
    println!("Reading LLVM IR from: {}", input_path.display());
    let ir_text = read_text_input("IR listing", input_path)?;

    println!("Converting IR to C code...");
    let analysis = analyze(&ir_text);
    let source = render_source_listing(&analysis, &config.source);

    println!("Writing C code to: {}", output_path.display());
    write_output("C source", output_path, &source)?;

    println!("Conversion complete: {} functions", analysis.listing.functions.len());
    Ok(())
}

/// Standalone listing: disclaimer, includes, commented globals and strings,
/// then one reconstructed body per function.
pub fn render_source_listing(analysis: &Analysis, config: &LoweringConfig) -> String {
    let listing = &analysis.listing;
    let mut lines: Vec<String> = vec![
        "// Decompiled C code from obfuscated LLVM IR".to_string(),
        "// Note: This is an approximation - exact reconstruction may not be possible".to_string(),
        String::new(),
        "#include <stdio.h>".to_string(),
        "#include <stdlib.h>".to_string(),
        String::new(),
    ];

    if !listing.globals.is_empty() {
        lines.push("// Global variables".to_string());
        for global in &listing.globals {
            lines.push(format!("// {} = {}", global.name, global.initializer()));
        }
        lines.push(String::new());
    }

    let named: Vec<_> = listing.strings.iter().filter(|s| s.name.is_some()).collect();
    if !named.is_empty() {
        lines.push("// String constants".to_string());
        for constant in named {
            lines.push(format!(
                "// const char* {} = \"{}\";",
                constant.name.as_deref().unwrap_or_default(),
                escape_c_literal(&constant.decoded_value)
            ));
        }
        lines.push(String::new());
    }

    for function in &listing.functions {
        lines.push(decompile_function(function, config));
        lines.push(String::new());
    }

    lines.join("\n")
}
