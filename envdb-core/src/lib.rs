//! envdb-core
//!
//! Temporal alignment and astronomical enrichment primitives shared across
//! the envdb workspace.
//!
//! - `normalize`: parse raw date values into instants labeled with one
//!   canonical timezone.
//! - `astral`: per-day memoized solar and lunar events, the solar-cycle
//!   classifier, and a built-in SPA ephemeris.
//! - `timeseries`: cadence inference, deduplication, tz-aware bucketing,
//!   resampling and the outer merge.
//! - `connector`: traits for the external collaborators (weather archive,
//!   solar and lunar ephemerides).
//!
//! Everything here is synchronous except the weather collaborator, which is
//! an `async_trait` so that network-backed implementations and their
//! middleware can run under Tokio.
#![warn(missing_docs)]

/// Per-day astronomical cache, Sun and Moon engines, SPA ephemeris.
pub mod astral;
/// Collaborator traits consumed by the engine and orchestrator.
pub mod connector;
/// Date normalization into canonical-timezone instants.
pub mod normalize;
/// Decimal rounding applied to final outputs.
pub mod round;
/// Column-oriented timestamped series.
pub mod series;
/// Time-series utilities for inference, dedup, resampling and merging.
pub mod timeseries;
pub mod types;

pub use astral::{
    AstralDailyCache, DayEventSource, MoonDay, MoonEngine, SolarCycle, Spa, SunDay, SunEngine,
    TwilightWindow,
};
pub use connector::{
    HOURLY_VARIABLES, LunarEphemeris, SolarEphemeris, WeatherProvider, WeatherRequest,
};
pub use normalize::{DateNormalizer, RawDate, day_key, day_start, localize};
pub use round::{round_opt, round_to};
pub use series::{Column, Series};
pub use timeseries::bucket::{bucket_floor, next_bucket};
pub use timeseries::dedup::dedup_by_timestamp;
pub use timeseries::infer::{infer_native_frequency, infer_step_seconds};
pub use timeseries::merge::{MergedTable, NamedSeries, merge_outer};
pub use timeseries::resample::{resample, resample_from};
pub use types::*;
