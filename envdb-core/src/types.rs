//! Re-export of foundational types from `envdb-types`.
// Consolidated re-exports so downstream crates can depend on `envdb-core` only

pub use envdb_types::EnvDbError;
pub use envdb_types::{
    AggregationPlan, Attribution, BackoffConfig, EnvDbConfig, Frequency, InterpolationMethod,
    Location, PhaseLabel, Reducer, ResamplePolicy, ResolvedPlan, RetryConfig, SolarCyclePhase,
    SourceReport, SourceSpan, Span, WeatherCacheConfig,
};

pub use chrono_tz::Tz;

/// A point in time labeled with the configured canonical timezone.
pub type Instant = chrono::DateTime<Tz>;
