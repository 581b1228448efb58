//! Lexical obfuscation-marker detection.
//!
//! Each marker kind has a fixed textual signature that is counted over the
//! whole listing text, independently of the structural model. This is a
//! shallow heuristic: real obfuscation without the tell-tale names is missed,
//! and unrelated text that happens to contain the words (a comment saying
//! "opaque", a function named `fake_input`) is counted.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The six obfuscation techniques recognised by signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerKind {
    StringEncryption,
    OpaquePredicate,
    BogusCode,
    FakeLoop,
    Virtualization,
    ControlFlowFlattening,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 6] = [
        MarkerKind::StringEncryption,
        MarkerKind::OpaquePredicate,
        MarkerKind::BogusCode,
        MarkerKind::FakeLoop,
        MarkerKind::Virtualization,
        MarkerKind::ControlFlowFlattening,
    ];

    /// Regex source of the signature. Case-insensitive kinds carry `(?i)`.
    pub fn signature(self) -> &'static str {
        match self {
            MarkerKind::StringEncryption => r"@__obf_key",
            MarkerKind::OpaquePredicate => r"(?i)opaque|obfuscated",
            MarkerKind::BogusCode => r"0xDEADBEEF|0xCAFEBABE",
            MarkerKind::FakeLoop => r"(?i)fake|dummy.*loop",
            MarkerKind::Virtualization => r"(?i)@__obf_decrypt|@__vm_|bytecode",
            MarkerKind::ControlFlowFlattening => r"(?i)switch.*dispatch|flatten",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::StringEncryption => "String Encryption",
            MarkerKind::OpaquePredicate => "Opaque Predicates",
            MarkerKind::BogusCode => "Bogus Code",
            MarkerKind::FakeLoop => "Fake Loops",
            MarkerKind::Virtualization => "Code Virtualization",
            MarkerKind::ControlFlowFlattening => "Control Flow Flattening",
        }
    }

    /// One-line explanation of the technique, used in reports.
    pub fn description(self) -> &'static str {
        match self {
            MarkerKind::StringEncryption => {
                "Strings are encrypted at compile time and decrypted at runtime"
            }
            MarkerKind::OpaquePredicate => {
                "Conditional branches with always-true/false conditions to confuse analysis"
            }
            MarkerKind::BogusCode => "Dead code blocks inserted to mislead reverse engineers",
            MarkerKind::FakeLoop => "Loops that never execute to add complexity",
            MarkerKind::Virtualization => {
                "Functions converted to bytecode interpreted by a virtual machine"
            }
            MarkerKind::ControlFlowFlattening => {
                "Control flow restructured using switch-based dispatchers"
            }
        }
    }

    fn regex(self) -> &'static Regex {
        static COMPILED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
            MarkerKind::ALL
                .iter()
                .map(|kind| Regex::new(kind.signature()).expect("marker signature is valid"))
                .collect()
        });
        &COMPILED[self as usize]
    }
}

/// Occurrence count per marker kind. Kinds never seen report zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCounts {
    counts: BTreeMap<MarkerKind, usize>,
}

impl MarkerCounts {
    pub fn get(&self, kind: MarkerKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Kinds with a non-zero count, in declaration order.
    pub fn detected(&self) -> Vec<MarkerKind> {
        MarkerKind::ALL.into_iter().filter(|kind| self.get(*kind) > 0).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.detected().is_empty()
    }
}

/// Count non-overlapping signature matches for every marker kind.
pub fn detect_markers(text: &str) -> MarkerCounts {
    let counts = MarkerKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let hits = kind.regex().find_iter(text).count();
            (hits > 0).then_some((kind, hits))
        })
        .collect();
    MarkerCounts { counts }
}
