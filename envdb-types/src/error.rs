use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the envdb workspace.
///
/// Covers date parsing failures, cadence inference failures, merge-level
/// conflicts, undefined astronomical events, and failures reported by
/// external collaborators (weather archive, ephemeris).
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvDbError {
    /// A text timestamp did not match the expected format.
    #[error("invalid date format: {value:?} does not match {format:?}")]
    InvalidDateFormat {
        /// The offending raw value.
        value: String,
        /// The format string it was parsed against.
        format: String,
    },

    /// A series has no timestamps at all.
    #[error("empty series: {what}")]
    EmptySeries {
        /// Description of the empty input, e.g. a source name.
        what: String,
    },

    /// Consecutive timestamp deltas never stabilize into a native cadence.
    #[error("ambiguous frequency: {detail}")]
    AmbiguousFrequency {
        /// Human-readable explanation of why inference failed.
        detail: String,
    },

    /// The sources handed to the aligner do not overlap in time.
    #[error("sources do not overlap: {detail}")]
    NoOverlap {
        /// Which sources or ranges failed to overlap.
        detail: String,
    },

    /// The ephemeris could not produce an event for this location and day
    /// (e.g. polar day or polar night).
    #[error("undefined astral event {event} on {day}")]
    UndefinedAstralEvent {
        /// Calendar day that was requested.
        day: NaiveDate,
        /// Event name (`sunrise`, `dusk`, ...).
        event: String,
    },

    /// Invalid input argument or configuration value.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Inconsistent data (mismatched column lengths, unsorted index, ...).
    #[error("data issue: {0}")]
    Data(String),

    /// An external collaborator returned an error.
    #[error("{provider} failed: {msg}")]
    Provider {
        /// Provider name that failed.
        provider: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl EnvDbError {
    /// Helper: build an `InvalidDateFormat` error.
    pub fn invalid_date(value: impl Into<String>, format: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            value: value.into(),
            format: format.into(),
        }
    }

    /// Helper: build an `EmptySeries` error for a description of the input.
    pub fn empty_series(what: impl Into<String>) -> Self {
        Self::EmptySeries { what: what.into() }
    }

    /// Helper: build an `AmbiguousFrequency` error.
    pub fn ambiguous_frequency(detail: impl Into<String>) -> Self {
        Self::AmbiguousFrequency {
            detail: detail.into(),
        }
    }

    /// Helper: build a `NoOverlap` error.
    pub fn no_overlap(detail: impl Into<String>) -> Self {
        Self::NoOverlap {
            detail: detail.into(),
        }
    }

    /// Helper: build an `UndefinedAstralEvent` error.
    pub fn undefined_event(day: NaiveDate, event: impl Into<String>) -> Self {
        Self::UndefinedAstralEvent {
            day,
            event: event.into(),
        }
    }

    /// Helper: build a `Provider` error with the provider name and message.
    pub fn provider(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// True when the failure only concerns the record or source being
    /// processed and must not abort the whole run.
    #[must_use]
    pub const fn is_source_local(&self) -> bool {
        matches!(self, Self::InvalidDateFormat { .. })
    }

    /// True for failures of an external collaborator that may succeed when
    /// the same request is sent again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Other(_))
    }
}
