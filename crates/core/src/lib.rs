//! irlens-core
//!
//! Core library for reading textual LLVM IR listings produced by an
//! obfuscating compiler pipeline.
//!
//! This crate segments the listing text, builds a structural model of its
//! functions, globals and string constants, counts lexical obfuscation
//! markers, and lowers instructions to approximate C-like code.
//!
//! All substantive logic lives here so it is fully testable and reusable
//! from the CLI frontends.

pub mod analysis;
pub mod config;
pub mod decompile;
pub mod lowering;
pub mod markers;
pub mod metrics;
pub mod model;
pub mod segment;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
