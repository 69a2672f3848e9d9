//! envdb assembles multi-resolution environmental datasets.
//!
//! Overview
//! - Ingests raw sources (acoustic counts, sensor readings, ...) whose dates
//!   are normalized into one configured timezone, then sorted and
//!   deduplicated.
//! - Resamples every source to one output cadence, aggregating when the
//!   source is finer and filling (forward-fill or interpolation, bounded by a
//!   gap limit) when it is coarser.
//! - Outer-merges the sources, classifies every timestamp into a solar-cycle
//!   phase (rising, daylight, setting, night) and attaches hourly weather.
//! - Derives hourly and daily rollups grouped by solar-cycle day and phase,
//!   plus a per-day `all` row computed from the same raw values.
//!
//! Key behaviors and trade-offs
//! - Night spans midnight: pre-dawn night is attributed to the previous day,
//!   so a daily `night` row covers one uninterrupted night.
//! - Absence is never zero: uncovered timestamps and gaps past the fill limit
//!   stay missing through every rollup.
//! - Rounding happens once, after all aggregation.
//! - A source with unparseable dates is reported and skipped; cadence, merge,
//!   astral and weather failures abort the run.
//!
//! Building a dataset:
//! ```rust,ignore
//! use std::sync::Arc;
//! use envdb::{EnvDb, Frequency, RawSource, Reducer, ResamplePolicy};
//!
//! let db = EnvDb::builder()
//!     .location(48.886, 2.333, 35.0)
//!     .timezone(chrono_tz::Europe::Paris)
//!     .output_frequency("15min".parse()?)
//!     .weather(Arc::new(my_archive))
//!     .build()?;
//!
//! let clicks = RawSource::new("hydrophone", dates)
//!     .with_dense_column("clicks", counts)
//!     .with_policy(ResamplePolicy::aggregate(Reducer::Sum));
//! let dataset = db.build_dataset(vec![clicks]).await?;
//! for row in &dataset.daily {
//!     println!("{} {} {:?}", row.day, row.phase, row.values);
//! }
//! ```
//!
//! See `envdb/demos/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

mod aligner;
pub(crate) mod core;
mod ingest;
mod records;

pub use aligner::MultiSourceAligner;
pub use core::{EnvDb, EnvDbBuilder};
pub use ingest::{RawSource, ingest};
pub use records::{
    DailyAstralRecord, DailyRecord, DatasetInfo, HasValues, HourlyRecord, MultiResolutionDataset,
    RawRecord, Table,
};

pub use envdb_middleware::{CachingWeather, RetryingWeather, WeatherBuilder};

// Re-export core types for convenience
pub use envdb_core::{
    AggregationPlan, Attribution, BackoffConfig, Column, DateNormalizer, EnvDbConfig, EnvDbError,
    Frequency, HOURLY_VARIABLES, Instant, InterpolationMethod, Location, LunarEphemeris, MoonDay,
    MoonEngine, NamedSeries, PhaseLabel, RawDate, Reducer, ResamplePolicy, RetryConfig, Series,
    SolarCycle, SolarCyclePhase, SolarEphemeris, SourceReport, SourceSpan, Spa, Span, SunDay,
    SunEngine, TwilightWindow, Tz, WeatherCacheConfig, WeatherProvider, WeatherRequest,
};
