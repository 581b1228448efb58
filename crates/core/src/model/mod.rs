//! Structural model of an IR listing: functions, globals, and string constants.
//!
//! Everything here is built once per listing by [`build_listing`] and is
//! read-only afterwards. No control-flow or data-flow information is kept;
//! basic blocks are only counted.

mod builder;

pub use builder::{build_listing, decode_string_payload, parse_parameters, split_body};

use serde::{Deserialize, Serialize};

/// A single parameter descriptor from a function header.
///
/// `name` holds the bound variable name (without the `%` sigil) when the
/// parameter has one. Unnamed parameters keep only their raw type token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Raw parameter text with the variable binding removed (e.g. `i32 noundef`).
    pub type_raw: String,
    pub name: Option<String>,
}

impl Parameter {
    /// The descriptor shown to users: the bound name if present, otherwise the raw type.
    pub fn descriptor(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.type_raw)
    }
}

/// Position of a numeric block label inside a function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLabel {
    /// Label text without the trailing colon (e.g. `5`).
    pub label: String,
    /// Index into `Function::instructions` of the first instruction after the label.
    pub position: usize,
}

/// A function definition extracted from the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub return_type_raw: String,
    pub parameters: Vec<Parameter>,
    /// Instruction lines in body order, comments and block labels excluded.
    pub instructions: Vec<String>,
    pub block_labels: Vec<BlockLabel>,
}

impl Function {
    pub fn basic_block_count(&self) -> usize {
        self.block_labels.len()
    }

    /// Rough complexity: one point per instruction, two per basic block.
    pub fn complexity_score(&self) -> usize {
        self.instructions.len() + 2 * self.basic_block_count()
    }
}

/// Whether a global was declared with `global` or `constant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalKind {
    Global,
    Constant,
}

/// A global variable or constant declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSymbol {
    pub name: String,
    pub kind: GlobalKind,
    /// Everything after the `global`/`constant` keyword on the declaration line.
    pub declaration_tail: String,
}

impl GlobalSymbol {
    /// Initializer portion of the tail: text up to the first comma (drops `align N` etc.).
    pub fn initializer(&self) -> &str {
        self.declaration_tail.split(',').next().unwrap_or_default().trim()
    }
}

/// A `c"..."` string literal found in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringConstant {
    /// Global the literal initializes, if it sits on a global declaration line.
    pub name: Option<String>,
    /// Payload exactly as written between the quotes.
    pub raw: String,
    /// Escape-decoded payload, or `raw` unchanged when decoding fails.
    pub decoded_value: String,
}

/// Complete structural model for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub functions: Vec<Function>,
    pub globals: Vec<GlobalSymbol>,
    pub strings: Vec<StringConstant>,
}

impl Listing {
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn total_instructions(&self) -> usize {
        self.functions.iter().map(|f| f.instructions.len()).sum()
    }
}
