//! Line-local lowering of IR instructions to C-like statements.
//!
//! Each instruction line is classified by an ordered rule table; the first
//! rule that applies decides the output. A rule either produces a statement,
//! a comment placeholder, or elides the line. No names are tracked across
//! lines: temporaries are stripped for display and operands are simplified
//! syntactically.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::LoweringConfig;
use crate::model::Function;
use crate::segment::split_top_level;

/// Longest rendering of an operand that is not a literal or a symbol reference.
pub const MAX_DISPLAY_LEN: usize = 20;

/// Most call arguments rendered before the list is cut with `...`.
pub const MAX_RENDERED_ARGS: usize = 5;

/// Callee namespace for compiler intrinsics, which are never rendered.
pub const INTRINSIC_PREFIX: &str = "llvm.";

static TEMPORARY_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^%[-\w.$]+\s*=\s*").expect("temporary assignment pattern is valid")
});

static CALLEE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([\w.$]+)\s*\(").expect("callee pattern is valid"));

static INTEGER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer literal pattern is valid"));

/// Result of lowering one instruction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lowered {
    /// An executable C-like statement, already terminated.
    Statement(String),
    /// Explanatory text rendered as a `//` comment.
    Comment(String),
    /// Nothing is emitted for this line.
    Elided,
}

impl Lowered {
    /// Render as a single output line, or `None` when elided.
    pub fn into_line(self) -> Option<String> {
        match self {
            Lowered::Statement(stmt) => Some(stmt),
            Lowered::Comment(text) => Some(format!("// {text}")),
            Lowered::Elided => None,
        }
    }
}

/// An instruction line split into opcode and operand text, with any
/// `%tmp = ` prefix and call-site markers (`tail`, `musttail`, `notail`) removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Instruction<'a> {
    opcode: &'a str,
    operands: &'a str,
}

impl<'a> Instruction<'a> {
    fn parse(line: &'a str) -> Self {
        let mut rest = strip_temporary(line);
        loop {
            let (opcode, operands) = split_first_word(rest);
            if matches!(opcode, "tail" | "musttail" | "notail") {
                rest = operands;
                continue;
            }
            return Instruction { opcode, operands };
        }
    }
}

/// One entry in the ordered classification table. `None` means "does not
/// apply"; the next rule is tried.
struct Rule {
    name: &'static str,
    apply: fn(&Instruction<'_>) -> Option<Lowered>,
}

const RULES: [Rule; 7] = [
    Rule { name: "call", apply: lower_call },
    Rule { name: "return", apply: lower_return },
    Rule { name: "arithmetic", apply: lower_arithmetic },
    Rule { name: "comparison", apply: lower_comparison },
    Rule { name: "branch", apply: lower_branch },
    Rule { name: "memory", apply: lower_memory },
    Rule { name: "alloca", apply: lower_alloca },
];

/// Remove a leading `%name = ` assignment, if present.
pub fn strip_temporary(line: &str) -> &str {
    let line = line.trim();
    match TEMPORARY_ASSIGNMENT.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Lower a single instruction line.
pub fn lower_instruction(line: &str) -> Lowered {
    let instruction = Instruction::parse(line);
    for rule in &RULES {
        if let Some(lowered) = (rule.apply)(&instruction) {
            log::trace!("{} rule applied to `{}`", rule.name, line.trim());
            return lowered;
        }
    }
    Lowered::Elided
}

/// Lower a whole function body, capped at `config.max_lines` produced lines.
///
/// When lines are cut, one trailing comment reports how many were omitted.
pub fn lower_function_body(function: &Function, config: &LoweringConfig) -> Vec<String> {
    let mut produced = Vec::new();
    let mut labels = function.block_labels.iter().peekable();
    for (index, line) in function.instructions.iter().enumerate() {
        while let Some(label) = labels.next_if(|l| l.position <= index) {
            if config.emit_block_labels {
                produced.push(format!("// Basic block {}:", label.label));
            }
        }
        if let Some(out) = lower_instruction(line).into_line() {
            produced.push(out);
        }
    }
    if config.emit_block_labels {
        // Labels after the last instruction (empty trailing blocks).
        produced.extend(labels.map(|label| format!("// Basic block {}:", label.label)));
    }

    if produced.len() > config.max_lines {
        let omitted = produced.len() - config.max_lines;
        produced.truncate(config.max_lines);
        produced.push(format!("// ... {omitted} more lines omitted ..."));
    }
    produced
}

/// Render one operand: literals unchanged, symbol references without their
/// sigil, anything else cut to [`MAX_DISPLAY_LEN`] characters.
pub fn simplify_value(raw: &str) -> String {
    let value = raw.trim();
    if INTEGER_LITERAL.is_match(value) {
        return value.to_string();
    }
    if let Some(name) = value.strip_prefix('%') {
        return if name.is_empty() { "var".to_string() } else { name.to_string() };
    }
    if let Some(name) = value.strip_prefix('@') {
        return if name.is_empty() { "global".to_string() } else { name.to_string() };
    }
    value.chars().take(MAX_DISPLAY_LEN).collect()
}

/// Render a raw call argument list (`i32 %a, ptr @s`) as `a, s`.
pub fn simplify_args(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let args = split_top_level(raw);
    let mut rendered: Vec<String> = args
        .iter()
        .take(MAX_RENDERED_ARGS)
        .map(|arg| operand_value(arg))
        .collect();
    if args.len() > MAX_RENDERED_ARGS {
        rendered.push("...".to_string());
    }
    rendered.join(", ")
}

fn lower_call(inst: &Instruction<'_>) -> Option<Lowered> {
    if inst.opcode != "call" {
        return None;
    }
    let caps = CALLEE.captures(inst.operands)?;
    let callee = caps.get(1)?.as_str();
    if callee.starts_with(INTRINSIC_PREFIX) {
        return Some(Lowered::Elided);
    }
    let open = caps.get(0)?.end();
    let args = enclosed_args(&inst.operands[open..]).map(simplify_args).unwrap_or_default();
    Some(Lowered::Statement(format!("{callee}({args});")))
}

fn lower_return(inst: &Instruction<'_>) -> Option<Lowered> {
    if inst.opcode != "ret" {
        return None;
    }
    let operand = inst.operands.trim();
    if operand.is_empty() || operand == "void" {
        return Some(Lowered::Statement("return;".to_string()));
    }
    let operand = first_top_level(operand);
    if matches!(value_token(operand), "undef" | "poison" | "void") {
        return Some(Lowered::Statement("return;".to_string()));
    }
    Some(Lowered::Statement(format!("return {};", operand_value(operand))))
}

fn lower_arithmetic(inst: &Instruction<'_>) -> Option<Lowered> {
    let symbol = match inst.opcode {
        "add" => "+",
        "sub" => "-",
        "mul" => "*",
        "udiv" | "sdiv" => "/",
        _ => return None,
    };
    let (left, right) = binary_operands(inst.operands)?;
    Some(Lowered::Comment(format!("{left} {symbol} {right}")))
}

fn lower_comparison(inst: &Instruction<'_>) -> Option<Lowered> {
    if inst.opcode != "icmp" {
        return None;
    }
    let (predicate, operands) = split_first_word(inst.operands);
    let symbol = match predicate {
        "eq" => "==",
        "ne" => "!=",
        "ult" => "<",
        "ugt" => ">",
        _ => return None,
    };
    let (left, right) = binary_operands(operands)?;
    Some(Lowered::Comment(format!("{left} {symbol} {right}")))
}

fn lower_branch(inst: &Instruction<'_>) -> Option<Lowered> {
    (inst.opcode == "br").then(|| Lowered::Comment("branch instruction".to_string()))
}

fn lower_memory(inst: &Instruction<'_>) -> Option<Lowered> {
    matches!(inst.opcode, "load" | "store")
        .then(|| Lowered::Comment("memory operation".to_string()))
}

fn lower_alloca(inst: &Instruction<'_>) -> Option<Lowered> {
    (inst.opcode == "alloca").then(|| Lowered::Comment("local variable".to_string()))
}

/// `nsw i32 %a, %b` -> (`a`, `b`). Flags and the type are dropped by taking
/// the last token of each operand.
fn binary_operands(operands: &str) -> Option<(String, String)> {
    let parts = split_top_level(operands);
    let (left, right) = (parts.first()?, parts.get(1)?);
    Some((operand_value(left), operand_value(right)))
}

fn split_first_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim_start()),
        None => (text, ""),
    }
}

/// Simplified value of one typed operand. Aggregate and constant-expression
/// values (`{ i32 1, i32 2 }`, `getelementptr (...)`) have no single value
/// token, so the whole operand is truncated instead.
fn operand_value(operand: &str) -> String {
    let token = value_token(operand);
    if token.ends_with([')', ']', '}', '>']) {
        simplify_value(operand)
    } else {
        simplify_value(token)
    }
}

/// Last whitespace-separated token: the value in `<type> <attrs> <value>`.
fn value_token(operand: &str) -> &str {
    operand.split_whitespace().last().unwrap_or_default()
}

fn first_top_level(text: &str) -> &str {
    split_top_level(text).into_iter().next().unwrap_or(text)
}

/// Text inside the parentheses that `rest` starts within, up to the matching
/// close. `None` when the list never closes.
fn enclosed_args(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..idx]);
                }
            }
            _ => {}
        }
    }
    None
}
