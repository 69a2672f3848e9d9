//! Envdb configuration primitives, error type and report envelopes.
#![warn(missing_docs)]

mod attribution;
mod config;
mod error;
mod frequency;
mod phase;
mod reducer;
mod reports;

pub use attribution::{Attribution, SourceSpan, Span};
pub use config::{
    BackoffConfig, EnvDbConfig, InterpolationMethod, Location, ResamplePolicy, RetryConfig,
    WeatherCacheConfig,
};
pub use error::EnvDbError;
pub use frequency::Frequency;
pub use phase::{PhaseLabel, SolarCyclePhase};
pub use reducer::{AggregationPlan, Reducer, ResolvedPlan};
pub use reports::SourceReport;
