//! Whole-listing complexity and obfuscation metrics.

use serde::{Deserialize, Serialize};

use crate::markers::{MarkerCounts, MarkerKind};
use crate::model::{Function, Listing};

/// A function whose complexity score is strictly greater than this counts as
/// obfuscated.
pub const OBFUSCATED_COMPLEXITY_THRESHOLD: usize = 10;

/// Snapshot of listing-level metrics.
///
/// `obfuscated_instructions` always equals `total_instructions`: individual
/// instructions are not attributed to obfuscation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingMetrics {
    pub total_functions: usize,
    pub obfuscated_functions: usize,
    pub total_instructions: usize,
    pub obfuscated_instructions: usize,
    pub string_encryptions: usize,
    pub opaque_predicates: usize,
    pub bogus_code_blocks: usize,
    pub fake_loops: usize,
    pub virtualized_functions: usize,
    pub control_flow_obfuscations: usize,
}

/// Per-function row for complexity tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub name: String,
    pub basic_blocks: usize,
    pub instructions: usize,
    pub complexity_score: usize,
    pub obfuscated: bool,
}

impl From<&Function> for FunctionMetrics {
    fn from(function: &Function) -> Self {
        Self {
            name: function.name.clone(),
            basic_blocks: function.basic_block_count(),
            instructions: function.instructions.len(),
            complexity_score: function.complexity_score(),
            obfuscated: is_obfuscated(function),
        }
    }
}

pub fn is_obfuscated(function: &Function) -> bool {
    function.complexity_score() > OBFUSCATED_COMPLEXITY_THRESHOLD
}

/// Aggregate the structural model and marker counts.
pub fn compute_metrics(listing: &Listing, markers: &MarkerCounts) -> ListingMetrics {
    let total_instructions = listing.total_instructions();
    ListingMetrics {
        total_functions: listing.functions.len(),
        obfuscated_functions: listing.functions.iter().filter(|f| is_obfuscated(f)).count(),
        total_instructions,
        obfuscated_instructions: total_instructions,
        string_encryptions: markers.get(MarkerKind::StringEncryption),
        opaque_predicates: markers.get(MarkerKind::OpaquePredicate),
        bogus_code_blocks: markers.get(MarkerKind::BogusCode),
        fake_loops: markers.get(MarkerKind::FakeLoop),
        virtualized_functions: markers.get(MarkerKind::Virtualization),
        control_flow_obfuscations: markers.get(MarkerKind::ControlFlowFlattening),
    }
}

/// Complexity rows for every function, in listing order.
pub fn function_metrics(listing: &Listing) -> Vec<FunctionMetrics> {
    listing.functions.iter().map(FunctionMetrics::from).collect()
}
