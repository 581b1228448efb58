use std::sync::LazyLock;

use regex::Regex;

use super::{BlockLabel, Function, GlobalKind, GlobalSymbol, Listing, Parameter, StringConstant};
use crate::segment::{self, FunctionSpan};

/// Name prefixes of definitions that are toolchain infrastructure rather than
/// program logic: the reserved double-underscore namespace and LLVM intrinsics.
const SKIPPED_PREFIXES: [&str; 2] = ["__", "llvm."];

static BLOCK_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):").expect("block label pattern is valid"));

static BOUND_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%([\w.$-]+)$").expect("bound variable pattern is valid"));

/// Build the structural model for a whole listing.
///
/// Irregular declarations are skipped; nothing here fails.
pub fn build_listing(text: &str) -> Listing {
    let mut functions: Vec<Function> = Vec::new();
    for span in segment::function_spans(text) {
        if SKIPPED_PREFIXES.iter().any(|prefix| span.name.starts_with(prefix)) {
            log::debug!("skipping infrastructure function @{}", span.name);
            continue;
        }
        let function = build_function(&span);
        match functions.iter_mut().find(|f| f.name == function.name) {
            Some(existing) => {
                log::debug!("@{} defined again; keeping the later definition", function.name);
                *existing = function;
            }
            None => functions.push(function),
        }
    }

    let globals = segment::global_decls(text)
        .into_iter()
        .map(|decl| GlobalSymbol {
            name: decl.name.to_string(),
            kind: match decl.keyword {
                "constant" => GlobalKind::Constant,
                _ => GlobalKind::Global,
            },
            declaration_tail: decl.tail.to_string(),
        })
        .collect();

    let strings = segment::string_literals(text)
        .into_iter()
        .map(|lit| StringConstant {
            name: lit.name.map(str::to_string),
            raw: lit.payload.to_string(),
            decoded_value: decode_string_payload(lit.payload),
        })
        .collect();

    Listing { functions, globals, strings }
}

fn build_function(span: &FunctionSpan<'_>) -> Function {
    let (instructions, block_labels) = split_body(span.body);
    Function {
        name: span.name.to_string(),
        return_type_raw: span.return_type.to_string(),
        parameters: parse_parameters(span.params),
        instructions,
        block_labels,
    }
}

/// Split a raw parameter list on top-level commas into descriptors.
///
/// The binding is the trailing `%name` token; `%` references nested in
/// attributes such as `byval(%struct.S)` are part of the type.
pub fn parse_parameters(raw: &str) -> Vec<Parameter> {
    segment::split_top_level(raw)
        .into_iter()
        .filter(|token| !token.is_empty())
        .map(parse_parameter)
        .collect()
}

fn parse_parameter(token: &str) -> Parameter {
    if let Some((type_raw, last)) = token.rsplit_once(char::is_whitespace) {
        if let Some(caps) = BOUND_VARIABLE.captures(last) {
            return Parameter {
                type_raw: type_raw.trim().to_string(),
                name: Some(caps[1].to_string()),
            };
        }
    }
    Parameter { type_raw: token.to_string(), name: None }
}

/// Split a function body into instruction lines and numeric block labels.
///
/// Blank lines and comment-only lines are dropped. Trailing `;` comments are
/// stripped from instruction lines.
pub fn split_body(body: &str) -> (Vec<String>, Vec<BlockLabel>) {
    let mut instructions = Vec::new();
    let mut labels = Vec::new();
    for line in body.lines() {
        let code = strip_comment(line).trim();
        if code.is_empty() {
            continue;
        }
        if let Some(caps) = BLOCK_LABEL.captures(code) {
            labels.push(BlockLabel {
                label: caps[1].to_string(),
                position: instructions.len(),
            });
            continue;
        }
        instructions.push(code.to_string());
    }
    (instructions, labels)
}

/// Drop a `;` comment, ignoring semicolons inside double quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Decode an IR string payload (`\\` and `\HH` escapes).
///
/// Unknown escapes, truncated escapes, or bytes that do not form UTF-8 leave
/// the payload as written.
pub fn decode_string_payload(raw: &str) -> String {
    match try_decode(raw) {
        Some(decoded) => decoded,
        None => {
            log::debug!("keeping undecodable string payload as written: {raw:?}");
            raw.to_string()
        }
    }
}

fn try_decode(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match bytes.get(i + 1) {
            Some(b'\\') => {
                out.push(b'\\');
                i += 2;
            }
            Some(_) => {
                let hex = raw.get(i + 1..i + 3)?;
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return None;
                }
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            None => return None,
        }
    }
    String::from_utf8(out).ok()
}
