use std::collections::BTreeMap;

use crate::series::{Column, Series};
use crate::types::{EnvDbError, Instant, Reducer};

/// Sort rows by timestamp and collapse duplicates with `keep`.
///
/// Each column is reduced independently, so a duplicated timestamp whose
/// rows disagree on which values are missing still keeps every present one.
///
/// # Errors
/// Returns `Data` when a row's width differs from `names`.
pub fn dedup_by_timestamp(
    names: Vec<String>,
    rows: Vec<(Instant, Vec<Option<f64>>)>,
    keep: Reducer,
) -> Result<Series, EnvDbError> {
    let width = names.len();
    let mut groups: BTreeMap<Instant, Vec<Vec<Option<f64>>>> = BTreeMap::new();
    for (ts, values) in rows {
        if values.len() != width {
            return Err(EnvDbError::Data(format!(
                "row at {ts} has {} values for {width} columns",
                values.len()
            )));
        }
        groups.entry(ts).or_default().push(values);
    }

    let mut timestamps = Vec::with_capacity(groups.len());
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(groups.len()); width];
    for (ts, group) in groups {
        timestamps.push(ts);
        for (j, col) in columns.iter_mut().enumerate() {
            let v = if group.len() == 1 {
                group[0][j].filter(|x| !x.is_nan())
            } else {
                keep.reduce(group.iter().map(|r| r[j]))
            };
            col.push(v);
        }
    }

    Ok(Series::from_parts(
        timestamps,
        names
            .into_iter()
            .zip(columns)
            .map(|(n, v)| Column::new(n, v))
            .collect(),
    ))
}
