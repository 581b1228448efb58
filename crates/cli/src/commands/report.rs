use std::path::Path;

use anyhow::{Context, Result};
use irlens_core::analysis::{analyze, Analysis};
use irlens_core::config::{LoweringConfig, ToolConfig};
use irlens_core::decompile::decompile_function;
use irlens_core::markers::MarkerCounts;
use irlens_core::metrics::function_metrics;

use crate::{read_text_input, sha256_hex, write_output};

/// Raw IR lines shown when no function could be extracted.
const FALLBACK_IR_LINES: usize = 50;

const STYLE: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
.container { max-width: 1400px; margin: 0 auto; background: #fff; padding: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
h2 { color: #34495e; margin-top: 30px; }
.comparison { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin: 20px 0; }
.code-block { background: #2d2d2d; color: #f8f8f2; padding: 15px; border-radius: 5px; overflow-x: auto; font-family: 'Consolas', 'Monaco', monospace; font-size: 14px; line-height: 1.5; }
.original { border-left: 4px solid #27ae60; }
.obfuscated { border-left: 4px solid #e74c3c; }
.metrics { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin: 20px 0; }
.metric-card { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: #fff; padding: 20px; border-radius: 8px; text-align: center; }
.metric-value { font-size: 32px; font-weight: bold; margin: 10px 0; }
.metric-label { font-size: 14px; opacity: 0.9; }
.techniques { background: #ecf0f1; padding: 20px; border-radius: 5px; margin: 20px 0; }
.technique { padding: 10px; margin: 5px 0; background: #fff; border-left: 3px solid #3498db; border-radius: 3px; }
.highlight { background: #fff3cd; padding: 2px 4px; border-radius: 3px; }
.summary { background: #e8f5e9; padding: 20px; border-radius: 5px; border-left: 4px solid #4caf50; margin: 20px 0; }
table.complexity { border-collapse: collapse; width: 100%; }
table.complexity th, table.complexity td { border: 1px solid #ddd; padding: 8px; text-align: left; }
table.complexity th { background: #34495e; color: #fff; }
tr.obfuscated-row td { background: #fdecea; }
pre { margin: 0; white-space: pre-wrap; word-wrap: break-word; }
footer { margin-top: 30px; font-size: 12px; color: #7f8c8d; }
"#;

/// Provenance shown in the report footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub ir_sha256: String,
    pub generated_at: String,
}

/// Read both inputs, analyze the IR, and write a self-contained HTML report.
///
/// With `json` set, the metrics snapshot is printed to stdout as JSON instead
/// of the progress lines.
pub fn report_command(
    original_path: &Path,
    ir_path: &Path,
    output_path: &Path,
    config: &ToolConfig,
    json: bool,
) -> Result<()> {
    let original_source = read_text_input("original source", original_path)?;
    if !json {
        println!("Parsing obfuscated IR: {}", ir_path.display());
    }
    let ir_text = read_text_input("IR listing", ir_path)?;
    let analysis = analyze(&ir_text);

    if !json {
        println!("Generating analysis report...");
    }
    let meta = ReportMeta {
        ir_sha256: sha256_hex(ir_text.as_bytes()),
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    let html = render_report(&original_source, &ir_text, &analysis, &config.report, &meta);
    write_output("report", output_path, &html)?;

    if json {
        let serialized = serde_json::to_string_pretty(&analysis.metrics)
            .context("Failed to serialize metrics to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Report generated: {}", output_path.display());
    println!();
    println!("Analysis complete:");
    println!("  Original source: {}", original_path.display());
    println!("  Obfuscated IR: {}", ir_path.display());
    println!("  Report: {}", output_path.display());
    Ok(())
}

/// Escape text for embedding in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Decompiled view of every extracted function, or the head of the raw IR
/// when nothing was extracted.
pub fn decompiled_code(ir_text: &str, analysis: &Analysis, config: &LoweringConfig) -> String {
    if analysis.listing.functions.is_empty() {
        let head: Vec<&str> = ir_text.lines().take(FALLBACK_IR_LINES).collect();
        return format!("{}\n\n// ... (truncated for display) ...", head.join("\n"));
    }
    let mut out = String::new();
    for function in &analysis.listing.functions {
        out.push_str(&decompile_function(function, config));
        out.push_str("\n\n");
    }
    out
}

/// One `<div class="technique">` per detected marker kind, or the default
/// entry when nothing was detected.
pub fn techniques_html(markers: &MarkerCounts) -> String {
    let detected = markers.detected();
    if detected.is_empty() {
        return "<div class=\"technique\">Basic obfuscation techniques applied \
                (instruction substitution, variable renaming)</div>"
            .to_string();
    }
    detected
        .into_iter()
        .map(|kind| {
            format!(
                "<div class=\"technique\"><strong>{}:</strong> {} ({} occurrences)</div>",
                kind.label(),
                kind.description(),
                markers.get(kind)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn complexity_table(analysis: &Analysis) -> String {
    let mut out = String::from(
        "<table class=\"complexity\">\n<tr><th>Function</th><th>Basic Blocks</th>\
         <th>Instructions</th><th>Complexity Score</th></tr>\n",
    );
    for row in function_metrics(&analysis.listing) {
        let class = if row.obfuscated { " class=\"obfuscated-row\"" } else { "" };
        out.push_str(&format!(
            "<tr{class}><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.name),
            row.basic_blocks,
            row.instructions,
            row.complexity_score
        ));
    }
    out.push_str("</table>");
    out
}

fn metric_card(label: &str, value: usize) -> String {
    format!(
        "<div class=\"metric-card\"><div class=\"metric-label\">{label}</div>\
         <div class=\"metric-value\">{value}</div></div>\n"
    )
}

/// Render the full HTML document.
pub fn render_report(
    original_source: &str,
    ir_text: &str,
    analysis: &Analysis,
    config: &LoweringConfig,
    meta: &ReportMeta,
) -> String {
    let m = &analysis.metrics;
    let mut cards = String::new();
    for (label, value) in [
        ("Total Functions", m.total_functions),
        ("Obfuscated Functions", m.obfuscated_functions),
        ("String Encryptions", m.string_encryptions),
        ("Opaque Predicates", m.opaque_predicates),
        ("Bogus Code Blocks", m.bogus_code_blocks),
        ("Fake Loops", m.fake_loops),
        ("Virtualized Functions", m.virtualized_functions),
        ("Control Flow Obfuscations", m.control_flow_obfuscations),
        ("Total Instructions", m.total_instructions),
    ] {
        cards.push_str(&metric_card(label, value));
    }

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("<title>Obfuscation Analysis Report</title>\n");
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n<div class=\"container\">\n"));
    html.push_str("<h1>LLVM Obfuscation Analysis Report</h1>\n");
    html.push_str(
        "<div class=\"summary\"><h2>Executive Summary</h2><p>This report compares the \
         original source code with a C-like reconstruction of the obfuscated LLVM IR.</p></div>\n",
    );

    html.push_str("<h2>Obfuscation Metrics</h2>\n<div class=\"metrics\">\n");
    html.push_str(&cards);
    html.push_str("</div>\n");

    html.push_str("<h2>Code Comparison</h2>\n<div class=\"comparison\">\n");
    html.push_str(&format!(
        "<div><h3>Original Source Code</h3><div class=\"code-block original\"><pre>{}</pre></div></div>\n",
        escape_html(original_source)
    ));
    html.push_str(&format!(
        "<div><h3>Obfuscated LLVM IR (Decompiled)</h3><div class=\"code-block obfuscated\"><pre>{}</pre></div></div>\n",
        escape_html(&decompiled_code(ir_text, analysis, config))
    ));
    html.push_str("</div>\n");

    html.push_str("<h2>Applied Obfuscation Techniques</h2>\n<div class=\"techniques\">\n");
    html.push_str(&techniques_html(&analysis.markers));
    html.push_str("\n</div>\n");

    html.push_str("<h2>Complexity Analysis</h2>\n");
    html.push_str(&complexity_table(analysis));
    html.push('\n');

    html.push_str("<h2>Key Observations</h2>\n<div class=\"summary\"><ul>\n");
    html.push_str(&format!(
        "<li><strong>Code Size:</strong> the obfuscated listing contains \
         <span class=\"highlight\">{}</span> instructions across {} functions</li>\n",
        m.total_instructions, m.total_functions
    ));
    html.push_str(&format!(
        "<li><strong>Complex Functions:</strong> {} of {} functions score above the \
         obfuscation threshold</li>\n",
        m.obfuscated_functions, m.total_functions
    ));
    html.push_str(
        "<li><strong>Readability:</strong> the reconstruction is approximate; branches and \
         memory accesses are shown as placeholders</li>\n",
    );
    html.push_str("</ul></div>\n");

    html.push_str(&format!(
        "<footer>IR SHA-256: {} &middot; generated {} &middot; irlens-core {}</footer>\n",
        escape_html(&meta.ir_sha256),
        escape_html(&meta.generated_at),
        irlens_core::version()
    ));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
