//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::EnvDbError;
use crate::frequency::Frequency;

/// Summary of one source's trip through ingestion and resampling.
///
/// A source whose dates failed to parse is still reported, with
/// `included == false` and the failure in `warnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Source name.
    pub name: String,
    /// Rows handed to ingestion.
    pub rows_in: usize,
    /// Rows left after deduplication by timestamp.
    pub rows_deduped: usize,
    /// Rows after resampling to the output cadence.
    pub rows_out: usize,
    /// Native cadence inferred (or hinted) for the source.
    pub native_frequency: Option<Frequency>,
    /// Whether the source made it into the merged table.
    pub included: bool,
    /// Non-fatal issues encountered while processing the source.
    pub warnings: Vec<EnvDbError>,
}

impl SourceReport {
    /// Empty report for a named source.
    #[must_use]
    pub fn new(name: impl Into<String>, rows_in: usize) -> Self {
        Self {
            name: name.into(),
            rows_in,
            rows_deduped: 0,
            rows_out: 0,
            native_frequency: None,
            included: false,
            warnings: vec![],
        }
    }
}
