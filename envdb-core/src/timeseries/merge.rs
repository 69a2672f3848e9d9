use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::series::{Column, Series};
use crate::types::{Attribution, EnvDbError, Instant};

/// A resampled series tagged with the name of the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    /// Source name.
    pub name: String,
    /// Resampled observations.
    pub series: Series,
}

impl NamedSeries {
    /// Tag a series with its source name.
    pub fn new(name: impl Into<String>, series: Series) -> Self {
        Self {
            name: name.into(),
            series,
        }
    }
}

/// Result of [`merge_outer`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    /// Union of all timestamps and columns.
    pub series: Series,
    /// Span contributed by each source, in source order.
    pub attribution: Attribution,
}

/// Outer-merge sources on the timestamp key, in priority order (first is highest).
///
/// - Every timestamp of every source appears in the output.
/// - Columns are the union of source columns in first-seen order; a source
///   not covering a timestamp leaves its columns missing there (never zero).
/// - When two sources share a column name, the first source wins where it
///   has a value and later sources back-fill its gaps.
///
/// # Errors
/// - `EmptySeries` when no source is given or a source has no rows.
/// - `NoOverlap` when two or more sources share no common time range.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "envdb::core::merge_outer",
        skip(sources),
        fields(sources = sources.len()),
        err,
    )
)]
pub fn merge_outer(sources: &[NamedSeries]) -> Result<MergedTable, EnvDbError> {
    if sources.is_empty() {
        return Err(EnvDbError::empty_series("no sources to merge"));
    }

    let mut attribution = Attribution::new();
    for s in sources {
        let span = s
            .series
            .span()
            .ok_or_else(|| EnvDbError::empty_series(s.name.clone()))?;
        attribution.push(s.name.clone(), span);
    }
    if sources.len() > 1 && attribution.common_span().is_none() {
        let ranges: Vec<String> = attribution
            .spans
            .iter()
            .map(|s| format!("{}=[{}, {}]", s.source, s.span.start, s.span.end))
            .collect();
        return Err(EnvDbError::no_overlap(ranges.join(", ")));
    }

    let mut names: Vec<String> = Vec::new();
    let mut slot_of: Vec<Vec<usize>> = Vec::with_capacity(sources.len());
    for s in sources {
        let slots = s
            .series
            .columns()
            .iter()
            .map(|c| {
                names.iter().position(|n| *n == c.name).unwrap_or_else(|| {
                    names.push(c.name.clone());
                    names.len() - 1
                })
            })
            .collect();
        slot_of.push(slots);
    }

    let width = names.len();
    let mut rows: BTreeMap<Instant, Vec<Option<f64>>> = BTreeMap::new();
    for (s, slots) in sources.iter().zip(&slot_of) {
        for (i, ts) in s.series.timestamps().iter().enumerate() {
            let row = match rows.entry(*ts) {
                Entry::Vacant(v) => v.insert(vec![None; width]),
                Entry::Occupied(o) => o.into_mut(),
            };
            for (j, &slot) in slots.iter().enumerate() {
                if row[slot].is_none() {
                    row[slot] = s.series.value(i, j);
                }
            }
        }
    }

    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(rows.len()); width];
    let mut timestamps = Vec::with_capacity(rows.len());
    for (ts, row) in rows {
        timestamps.push(ts);
        for (col, v) in columns.iter_mut().zip(row) {
            col.push(v);
        }
    }

    Ok(MergedTable {
        series: Series::from_parts(
            timestamps,
            names
                .into_iter()
                .zip(columns)
                .map(|(n, v)| Column::new(n, v))
                .collect(),
        ),
        attribution,
    })
}
