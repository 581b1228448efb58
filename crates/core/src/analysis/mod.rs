//! End-to-end extraction pipeline over one IR listing.
//!
//! raw text -> segmenter -> structural model, marker scan -> metrics.
//! The result is immutable; running twice on the same text yields equal
//! results.

use serde::{Deserialize, Serialize};

use crate::markers::{detect_markers, MarkerCounts};
use crate::metrics::{compute_metrics, ListingMetrics};
use crate::model::{build_listing, Listing};

/// Everything extracted from one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub listing: Listing,
    pub markers: MarkerCounts,
    pub metrics: ListingMetrics,
}

/// Run the extraction pipeline over `text`.
pub fn analyze(text: &str) -> Analysis {
    let listing = build_listing(text);
    let markers = detect_markers(text);
    let metrics = compute_metrics(&listing, &markers);
    log::info!(
        "extracted {} functions, {} globals, {} strings ({} instructions)",
        metrics.total_functions,
        listing.globals.len(),
        listing.strings.len(),
        metrics.total_instructions
    );
    Analysis { listing, markers, metrics }
}
