use std::collections::{BTreeMap, BTreeSet};

use crate::series::{Column, Series};
use crate::timeseries::bucket::{bucket_floor, grid};
use crate::timeseries::infer::infer_native_frequency;
use crate::types::{
    AggregationPlan, EnvDbError, Frequency, Instant, InterpolationMethod, Reducer, ResamplePolicy,
    ResolvedPlan,
};

/// Retarget `series` to the `output` cadence.
///
/// The native cadence comes from `policy.native_hint` when set, otherwise it
/// is inferred (see [`crate::infer_step_seconds`]). See [`resample_from`] for
/// the refine/coarsen rules.
///
/// # Errors
/// - `EmptySeries` when the series has no rows.
/// - `AmbiguousFrequency` when no native cadence can be inferred.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "envdb::core::resample",
        skip(series, policy),
        fields(rows = series.len(), output = %output),
        err,
    )
)]
pub fn resample(
    series: &Series,
    output: Frequency,
    policy: &ResamplePolicy,
) -> Result<Series, EnvDbError> {
    if series.is_empty() {
        return Err(EnvDbError::empty_series("series has no timestamps"));
    }
    let native = match policy.native_hint {
        Some(f) => f,
        None => infer_native_frequency(series)?,
    };
    resample_from(series, native, output, policy)
}

/// Retarget `series`, whose native cadence is already known, to `output`.
///
/// - `native > output` (refine): observations are snapped onto the output
///   grid and each run of missing grid points is filled for at most
///   `gap_limit` points (default `floor(native / output)`), by forward fill
///   or by interpolation between the two bounding observations. Points
///   past the limit stay missing; rows left with no value at all are
///   dropped.
/// - otherwise (coarsen): rows are grouped by output bucket and each column
///   is reduced with its reducer from `policy.aggregation`. Only buckets
///   holding at least one row are emitted.
///
/// # Errors
/// Returns `EmptySeries` when the series has no rows.
pub fn resample_from(
    series: &Series,
    native: Frequency,
    output: Frequency,
    policy: &ResamplePolicy,
) -> Result<Series, EnvDbError> {
    if series.is_empty() {
        return Err(EnvDbError::empty_series("series has no timestamps"));
    }
    if native > output {
        let gap_limit = policy
            .gap_limit
            .unwrap_or_else(|| usize::try_from(native.ratio(output)).unwrap_or(usize::MAX));
        #[cfg(feature = "tracing")]
        tracing::debug!(%native, %output, gap_limit, "refining series");
        let snap = AggregationPlan::new(Reducer::Mean).resolve(&series.column_names());
        let anchors = group_by_bucket(series, output, &snap);
        Ok(refine(&anchors, output, gap_limit, policy))
    } else {
        #[cfg(feature = "tracing")]
        tracing::debug!(%native, %output, "coarsening series");
        let plan = policy.aggregation.resolve(&series.column_names());
        Ok(group_by_bucket(series, output, &plan))
    }
}

fn group_by_bucket(series: &Series, step: Frequency, plan: &ResolvedPlan) -> Series {
    let mut groups: BTreeMap<Instant, Vec<usize>> = BTreeMap::new();
    for (i, ts) in series.timestamps().iter().enumerate() {
        groups.entry(bucket_floor(ts, step)).or_default().push(i);
    }
    let columns = series
        .columns()
        .iter()
        .enumerate()
        .map(|(j, col)| {
            let reducer = plan.reducer(j);
            let values = groups
                .values()
                .map(|rows| reducer.reduce(rows.iter().map(|&i| col.values[i])))
                .collect();
            Column::new(col.name.clone(), values)
        })
        .collect();
    Series::from_parts(groups.into_keys().collect(), columns)
}

fn refine(anchors: &Series, step: Frequency, gap_limit: usize, policy: &ResamplePolicy) -> Series {
    let (Some(first), Some(last)) = (anchors.timestamps().first(), anchors.timestamps().last())
    else {
        return anchors.clone();
    };
    let mut slots: BTreeSet<Instant> = grid(first, last, step).into_iter().collect();
    slots.extend(anchors.timestamps().iter().copied());
    let times: Vec<Instant> = slots.into_iter().collect();

    let position: BTreeMap<Instant, usize> =
        times.iter().enumerate().map(|(i, t)| (*t, i)).collect();

    let mut columns: Vec<Column> = anchors
        .columns()
        .iter()
        .map(|c| {
            let mut values = vec![None; times.len()];
            for (ts, v) in anchors.timestamps().iter().zip(&c.values) {
                if let Some(&p) = position.get(ts) {
                    values[p] = *v;
                }
            }
            fill_gaps(&mut values, &times, gap_limit, policy);
            Column::new(c.name.clone(), values)
        })
        .collect();

    if columns.is_empty() {
        return Series::from_parts(times, columns);
    }
    let keep: Vec<bool> = (0..times.len())
        .map(|i| columns.iter().any(|c| c.values[i].is_some()))
        .collect();
    let times = times
        .into_iter()
        .zip(&keep)
        .filter_map(|(t, k)| k.then_some(t))
        .collect();
    for c in &mut columns {
        c.values = c
            .values
            .iter()
            .zip(&keep)
            .filter_map(|(v, k)| k.then_some(*v))
            .collect();
    }
    Series::from_parts(times, columns)
}

/// Fill each run of missing values that follows an observation, for at most
/// `limit` points.
fn fill_gaps(values: &mut [Option<f64>], times: &[Instant], limit: usize, policy: &ResamplePolicy) {
    let n = values.len();
    let mut prev: Option<usize> = None;
    let mut i = 0;
    while i < n {
        if values[i].is_some() {
            prev = Some(i);
            i += 1;
            continue;
        }
        let start = i;
        while i < n && values[i].is_none() {
            i += 1;
        }
        let Some(p) = prev else { continue };
        let next = (i < n).then_some(i);
        for k in start..(start.saturating_add(limit)).min(i) {
            values[k] = synthesize(values, times, p, next, k, policy);
        }
    }
}

fn synthesize(
    values: &[Option<f64>],
    times: &[Instant],
    p: usize,
    next: Option<usize>,
    k: usize,
    policy: &ResamplePolicy,
) -> Option<f64> {
    let vp = values[p]?;
    if !policy.interpolate {
        return Some(vp);
    }
    let q = next?;
    let vq = values[q]?;
    let tp = times[p].timestamp();
    let tq = times[q].timestamp();
    let tk = times[k].timestamp();
    match policy.interpolation {
        InterpolationMethod::Nearest => Some(if tk - tp <= tq - tk { vp } else { vq }),
        _ => {
            #[allow(clippy::cast_precision_loss)]
            let w = (tk - tp) as f64 / (tq - tp) as f64;
            Some(vp + (vq - vp) * w)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(min: i64) -> Instant {
        chrono_tz::UTC.timestamp_opt(min * 60, 0).unwrap()
    }

    fn hourly(values: &[Option<f64>], hours: &[i64]) -> Series {
        Series::new(
            hours.iter().map(|h| t(h * 60)).collect(),
            vec![Column::new("x", values.to_vec())],
        )
        .unwrap()
    }

    #[test]
    fn linear_refine_between_hours() {
        let s = hourly(&[Some(0.0), Some(4.0), Some(8.0)], &[0, 1, 2]);
        let out = resample(
            &s,
            "15min".parse().unwrap(),
            &ResamplePolicy::interpolated(InterpolationMethod::Linear),
        )
        .unwrap();
        assert_eq!(out.len(), 9);
        assert_eq!(out.value(1, 0), Some(1.0));
        assert_eq!(out.value(6, 0), Some(6.0));
    }

    #[test]
    fn nearest_picks_closest_bound() {
        let s = hourly(&[Some(0.0), Some(4.0), Some(8.0)], &[0, 1, 2]);
        let out = resample(
            &s,
            "15min".parse().unwrap(),
            &ResamplePolicy::interpolated(InterpolationMethod::Nearest),
        )
        .unwrap();
        let col: Vec<_> = out.columns()[0].values.iter().take(5).copied().collect();
        assert_eq!(col, [Some(0.0), Some(0.0), Some(0.0), Some(4.0), Some(4.0)]);
    }

    #[test]
    fn interpolation_needs_both_bounds() {
        // Last column value is missing, so the trailing run cannot be interpolated.
        let s = Series::new(
            vec![t(0), t(60), t(120), t(180)],
            vec![
                Column::new("x", vec![Some(0.0), Some(1.0), Some(2.0), None]),
                Column::dense("y", [0.0, 0.0, 0.0, 0.0]),
            ],
        )
        .unwrap();
        let out = resample(
            &s,
            "30min".parse().unwrap(),
            &ResamplePolicy::interpolated(InterpolationMethod::Linear),
        )
        .unwrap();
        let x = &out.column("x").unwrap().values;
        assert_eq!(x[4], Some(2.0));
        assert_eq!(x[5], None);
        assert_eq!(x[6], None);
    }

    #[test]
    fn coarsen_with_column_reducers() {
        let s = Series::new(
            (0..6).map(|m| t(m * 10)).collect(),
            vec![
                Column::dense("temp", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                Column::dense("clicks", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
            ],
        )
        .unwrap();
        let policy = ResamplePolicy {
            aggregation: AggregationPlan::new(Reducer::Mean)
                .with_column("clicks", Reducer::Sum),
            ..ResamplePolicy::default()
        };
        let out = resample(&s, "30min".parse().unwrap(), &policy).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.column("temp").unwrap().values, [Some(2.0), Some(5.0)]);
        assert_eq!(out.column("clicks").unwrap().values, [Some(3.0), Some(3.0)]);
    }

    #[test]
    fn hint_bypasses_inference() {
        let s = hourly(&[Some(1.0), Some(2.0)], &[0, 1]);
        assert!(matches!(
            resample(&s, Frequency::MINUTE, &ResamplePolicy::default()),
            Err(EnvDbError::AmbiguousFrequency { .. })
        ));
        let policy = ResamplePolicy {
            native_hint: Some(Frequency::HOUR),
            ..ResamplePolicy::default()
        };
        let out = resample(&s, "30min".parse().unwrap(), &policy).unwrap();
        assert_eq!(out.column("x").unwrap().values, [Some(1.0), Some(1.0), Some(2.0)]);
    }
}
