//! Configuration types shared across the engine, middleware and orchestrator.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::frequency::Frequency;
use crate::reducer::{AggregationPlan, Reducer};

/// Observer position used for every astronomical computation.
///
/// A location is part of the identity of an astral cache: a new location
/// requires a new cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees, north positive.
    pub latitude: f64,
    /// Longitude in decimal degrees, east positive.
    pub longitude: f64,
    /// Elevation above sea level in meters.
    pub elevation: f64,
}

impl Location {
    /// Build a location from coordinates and elevation.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    /// Bit-exact key usable in hash maps.
    #[must_use]
    pub const fn key(&self) -> (u64, u64, u64) {
        (
            self.latitude.to_bits(),
            self.longitude.to_bits(),
            self.elevation.to_bits(),
        )
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(48.886, 2.333, 35.0)
    }
}

/// How missing points are synthesized when refining a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum InterpolationMethod {
    /// Straight line between the two bounding observations.
    #[default]
    Linear,
    /// Value of the closest bounding observation (ties go to the earlier one).
    Nearest,
}

/// Per-source resampling policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResamplePolicy {
    /// When refining, interpolate between observations instead of forward-filling.
    pub interpolate: bool,
    /// Interpolation flavour used when `interpolate` is set.
    pub interpolation: InterpolationMethod,
    /// Reducers used when coarsening.
    pub aggregation: AggregationPlan,
    /// Maximum synthesized points per gap when refining.
    ///
    /// `None` means `floor(native / output)`.
    pub gap_limit: Option<usize>,
    /// Known native cadence; skips inference when set.
    pub native_hint: Option<Frequency>,
}

impl Default for ResamplePolicy {
    fn default() -> Self {
        Self {
            interpolate: false,
            interpolation: InterpolationMethod::Linear,
            aggregation: AggregationPlan::new(Reducer::Mean),
            gap_limit: None,
            native_hint: None,
        }
    }
}

impl ResamplePolicy {
    /// Coarsen with `reducer` for every column.
    #[must_use]
    pub fn aggregate(reducer: Reducer) -> Self {
        Self {
            aggregation: AggregationPlan::new(reducer),
            ..Self::default()
        }
    }

    /// Refine with interpolation of the given flavour.
    #[must_use]
    pub fn interpolated(method: InterpolationMethod) -> Self {
        Self {
            interpolate: true,
            interpolation: method,
            ..Self::default()
        }
    }
}

/// Exponential backoff configuration for retried collaborator calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor to increase delay after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 200,
            max_backoff_ms: 5_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

/// Retry budget for the weather archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts, the first call included.
    pub max_attempts: u32,
    /// Delay schedule between attempts.
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Response cache settings for the weather archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCacheConfig {
    /// Maximum number of cached responses.
    pub capacity: u64,
    /// Entry lifetime; `None` keeps entries until evicted by capacity.
    pub ttl: Option<Duration>,
}

impl Default for WeatherCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            ttl: None,
        }
    }
}

/// Global configuration for the `EnvDb` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvDbConfig {
    /// Observation site.
    pub location: Location,
    /// Canonical timezone every instant is labeled with.
    pub timezone: Tz,
    /// Cadence of the merged raw table.
    pub output_frequency: Frequency,
    /// Default `strftime` format for text timestamps.
    pub date_format: String,
    /// Reducer for rows sharing a timestamp within one source.
    pub dedup_reducer: Reducer,
    /// Resampling policy for sources without their own.
    pub resample: ResamplePolicy,
    /// Reducers for the hourly and daily rollups.
    pub rollup: AggregationPlan,
    /// Half width of the rising/setting twilight bands, in seconds.
    pub twilight_half_width_secs: f64,
    /// Decimal places kept in every numeric output.
    pub precision: u32,
    /// Retry policy applied to the weather archive.
    pub weather_retry: RetryConfig,
    /// Response cache applied to the weather archive.
    pub weather_cache: WeatherCacheConfig,
}

impl Default for EnvDbConfig {
    fn default() -> Self {
        Self {
            location: Location::default(),
            timezone: Tz::UTC,
            output_frequency: Frequency::MINUTE,
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            dedup_reducer: Reducer::Max,
            resample: ResamplePolicy::default(),
            rollup: AggregationPlan::new(Reducer::Mean),
            twilight_half_width_secs: 5_400.0,
            precision: 3,
            weather_retry: RetryConfig::default(),
            weather_cache: WeatherCacheConfig::default(),
        }
    }
}
