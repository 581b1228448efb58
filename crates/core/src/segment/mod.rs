//! Text segmentation of raw IR listings.
//!
//! Locates function definitions (header pieces plus body span), global
//! declaration lines, and `c"..."` string payloads. Nothing here interprets
//! the pieces; the model builder does that.
//!
//! Parameter lists are delimited by paren depth, so attributes such as
//! `byval(%struct.S)` stay inside the list. Function bodies are delimited by
//! brace depth. Braces inside string
//! literals or comments are not special-cased, so malformed input can move
//! the end of a body; the scan then stops at the end of the text.

use std::sync::LazyLock;

use regex::Regex;

/// Linkage, visibility, calling-convention and return attribute keywords that
/// may precede the return type in a `define` header.
const HEADER_QUALIFIERS: &str = "dso_local|dso_preemptable|internal|private|external|\
linkonce_odr|linkonce|weak_odr|weak|available_externally|hidden|protected|default|\
fastcc|coldcc|ccc|noundef|signext|zeroext|inreg|noalias|nonnull|local_unnamed_addr|unnamed_addr";

/// Qualifiers that may sit between `=` and `global`/`constant`.
const GLOBAL_QUALIFIERS: &str = "internal|private|external|common|dso_local|dso_preemptable|\
linkonce_odr|linkonce|weak_odr|weak|hidden|protected|default|thread_local|\
local_unnamed_addr|unnamed_addr|addrspace\\(\\d+\\)";

static FUNCTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"define\s+(?:(?:{HEADER_QUALIFIERS})\s+)*([^@\n]+?)\s+@([\w.$]+)\s*\("
    ))
    .expect("function header pattern is valid")
});

static GLOBAL_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*@([\w.$]+)[ \t]*=[ \t]*(?:(?:{GLOBAL_QUALIFIERS})[ \t]+)*(global|constant)\b(.*)$"
    ))
    .expect("global declaration pattern is valid")
});

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"c"([^"\n]*)""#).expect("string literal pattern is valid"));

static LINE_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@([\w.$]+)\s*=").expect("line binding pattern is valid"));

/// Raw pieces of one `define` header and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan<'a> {
    pub name: &'a str,
    pub return_type: &'a str,
    pub params: &'a str,
    /// Text between the opening brace and its matching closing brace (exclusive).
    pub body: &'a str,
    /// False when the brace scan reached the end of the text without closing.
    pub closed: bool,
}

/// Raw pieces of one global declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDecl<'a> {
    pub name: &'a str,
    /// `global` or `constant`.
    pub keyword: &'a str,
    pub tail: &'a str,
}

/// One `c"..."` payload, with the global it is bound to when it sits on a
/// declaration line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral<'a> {
    pub name: Option<&'a str>,
    pub payload: &'a str,
}

/// Scan forward from `start` (just past an opening brace, depth 1) and return
/// the byte offset of the matching closing brace, or `None` if the text ends
/// first.
pub fn matching_brace(text: &str, start: usize) -> Option<usize> {
    matching_close(text, start, b'{', b'}')
}

/// Same as [`matching_brace`] for parentheses.
pub fn matching_paren(text: &str, start: usize) -> Option<usize> {
    matching_close(text, start, b'(', b')')
}

fn matching_close(text: &str, start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if *byte == open {
            depth += 1;
        } else if *byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(start + offset);
            }
        }
    }
    None
}

/// Split on commas that are not nested in brackets of any kind.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        parts.push(tail);
    }
    parts
}

/// Every function definition header in `text`, in order of appearance.
pub fn function_spans(text: &str) -> Vec<FunctionSpan<'_>> {
    let mut spans = Vec::new();
    for caps in FUNCTION_HEADER.captures_iter(text) {
        let (Some(open), Some(ret), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(close) = matching_paren(text, open.end()) else {
            continue;
        };
        // The body brace must follow the parameter list on the same line;
        // attribute groups such as `#0` may sit in between.
        let rest = &text[close + 1..];
        let line_end = rest.find('\n').unwrap_or(rest.len());
        let Some(brace) = rest[..line_end].find('{') else {
            continue;
        };
        let body_start = close + 1 + brace + 1;
        let (body, closed) = match matching_brace(text, body_start) {
            Some(end) => (&text[body_start..end], true),
            None => {
                log::warn!("body of @{} is not closed; using the rest of the text", name.as_str());
                (&text[body_start..], false)
            }
        };
        spans.push(FunctionSpan {
            name: name.as_str(),
            return_type: ret.as_str().trim(),
            params: text[open.end()..close].trim(),
            body,
            closed,
        });
    }
    spans
}

/// Every global declaration line in `text`.
pub fn global_decls(text: &str) -> Vec<GlobalDecl<'_>> {
    GLOBAL_DECL
        .captures_iter(text)
        .filter_map(|caps| {
            Some(GlobalDecl {
                name: caps.get(1)?.as_str(),
                keyword: caps.get(2)?.as_str(),
                tail: caps.get(3)?.as_str().trim(),
            })
        })
        .collect()
}

/// Every non-empty `c"..."` payload in `text`.
pub fn string_literals(text: &str) -> Vec<StringLiteral<'_>> {
    let mut literals = Vec::new();
    for caps in STRING_LITERAL.captures_iter(text) {
        let Some(payload) = caps.get(1) else { continue };
        if payload.as_str().is_empty() {
            continue;
        }
        let line = line_containing(text, payload.start());
        let name = LINE_BINDING.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str());
        literals.push(StringLiteral { name, payload: payload.as_str() });
    }
    literals
}

fn line_containing(text: &str, offset: usize) -> &str {
    let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[offset..].find('\n').map(|i| offset + i).unwrap_or(text.len());
    &text[start..end]
}
