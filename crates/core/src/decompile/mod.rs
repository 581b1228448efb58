//! C-like reconstruction of whole functions.
//!
//! Combines a signature built from the header with the capped, lowered body.
//! The output is an approximation for reading, not something to compile.

use crate::config::LoweringConfig;
use crate::lowering::lower_function_body;
use crate::model::Function;

/// Map an IR type token to a C type name. Pointers become `void*`; unknown
/// types fall back to `int`.
pub fn c_type_for(raw: &str) -> &'static str {
    let raw = raw.trim();
    if raw.ends_with('*') || raw.split_whitespace().any(|tok| tok == "ptr") {
        return "void*";
    }
    for token in raw.split_whitespace() {
        let mapped = match token {
            "i1" => "bool",
            "i8" => "char",
            "i16" => "short",
            "i32" => "int",
            "i64" => "long long",
            "float" => "float",
            "double" => "double",
            "void" => "void",
            _ => continue,
        };
        return mapped;
    }
    "int"
}

/// `int add(int a, int b)`.
pub fn render_signature(function: &Function) -> String {
    let params: Vec<String> = function
        .parameters
        .iter()
        .enumerate()
        .map(|(idx, param)| {
            let name = param.name.clone().unwrap_or_else(|| format!("arg{idx}"));
            format!("{} {}", c_type_for(&param.type_raw), name)
        })
        .collect();
    format!("{} {}({})", c_type_for(&function.return_type_raw), function.name, params.join(", "))
}

/// Full C-like rendering of one function.
pub fn decompile_function(function: &Function, config: &LoweringConfig) -> String {
    let mut out = format!("{} {{\n", render_signature(function));
    for line in lower_function_body(function, config) {
        out.push_str("    ");
        out.push_str(&line);
        out.push('\n');
    }
    out.push('}');
    out
}

/// Escape decoded text for use inside a C string literal.
pub fn escape_c_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
