use crate::series::Series;
use crate::types::{EnvDbError, Frequency, Instant};

/// Infer the native step (in seconds) of strictly increasing timestamps.
///
/// A delta is accepted only when the delta right after it is equal, which
/// filters out one-off irregular gaps. The smallest accepted delta wins.
///
/// Unique consistent cadence (60s) despite a one-off 5-minute hole:
///
/// ```
/// use chrono::TimeZone;
/// use envdb_core::infer_step_seconds;
///
/// let t = |s: i64| chrono_tz::UTC.timestamp_opt(s, 0).unwrap();
/// // deltas: 60, 60, 300, 60, 60
/// let ts = vec![t(0), t(60), t(120), t(420), t(480), t(540)];
/// assert_eq!(infer_step_seconds(&ts).unwrap(), 60);
/// ```
///
/// # Errors
/// - `EmptySeries` when there are no timestamps.
/// - `AmbiguousFrequency` when no two consecutive deltas agree.
pub fn infer_step_seconds(timestamps: &[Instant]) -> Result<i64, EnvDbError> {
    if timestamps.is_empty() {
        return Err(EnvDbError::empty_series("no timestamps to infer a cadence from"));
    }
    let deltas: Vec<i64> = timestamps
        .windows(2)
        .map(|w| w[1].timestamp() - w[0].timestamp())
        .collect();

    deltas
        .windows(2)
        .filter(|w| w[0] == w[1] && w[0] > 0)
        .map(|w| w[0])
        .min()
        .ok_or_else(|| {
            EnvDbError::ambiguous_frequency(format!(
                "{} timestamps yield no two equal consecutive deltas",
                timestamps.len()
            ))
        })
}

/// Infer the [`Frequency`] of a series. See [`infer_step_seconds`].
///
/// # Errors
/// Same as [`infer_step_seconds`].
pub fn infer_native_frequency(series: &Series) -> Result<Frequency, EnvDbError> {
    Frequency::from_seconds(infer_step_seconds(series.timestamps())?)
}
