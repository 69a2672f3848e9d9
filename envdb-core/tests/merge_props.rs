mod common;

use std::collections::BTreeSet;

use common::ts;
use envdb_core::{Column, EnvDbError, NamedSeries, Series, Span, merge_outer};
use proptest::prelude::*;

fn source(name: &str, column: &str, minutes: &BTreeSet<i64>, value: f64) -> NamedSeries {
    let timestamps = minutes.iter().map(|m| ts(m * 60)).collect();
    let values = vec![value; minutes.len()];
    NamedSeries::new(name, Series::new(timestamps, vec![Column::dense(column, values)]).unwrap())
}

proptest! {
    #[test]
    fn every_timestamp_survives_and_gaps_stay_missing(
        a in prop::collection::btree_set(0i64..300, 1..80),
        b in prop::collection::btree_set(0i64..300, 1..80),
    ) {
        let (a_lo, a_hi) = (*a.first().unwrap(), *a.last().unwrap());
        let (b_lo, b_hi) = (*b.first().unwrap(), *b.last().unwrap());
        prop_assume!(a_lo.max(b_lo) <= a_hi.min(b_hi));

        let merged = merge_outer(&[
            source("probe", "temp", &a, 1.0),
            source("meter", "flow", &b, 2.0),
        ])
        .unwrap();
        let union: BTreeSet<i64> = a.union(&b).copied().collect();
        let got: Vec<i64> = merged.series.timestamps().iter().map(|t| t.timestamp() / 60).collect();
        prop_assert_eq!(got, union.iter().copied().collect::<Vec<_>>());

        let temp = &merged.series.column("temp").unwrap().values;
        let flow = &merged.series.column("flow").unwrap().values;
        for (i, m) in union.iter().enumerate() {
            prop_assert_eq!(temp[i], a.contains(m).then_some(1.0));
            prop_assert_eq!(flow[i], b.contains(m).then_some(2.0));
        }
        prop_assert_eq!(merged.attribution.spans[0].span, Span::new(a_lo * 60, a_hi * 60));
    }
}

#[test]
fn disjoint_sources_do_not_merge() {
    let a: BTreeSet<i64> = (0..10).collect();
    let b: BTreeSet<i64> = (20..30).collect();
    let err = merge_outer(&[source("a", "x", &a, 1.0), source("b", "y", &b, 1.0)]).unwrap_err();
    assert!(matches!(err, EnvDbError::NoOverlap { .. }));
}

#[test]
fn shared_column_backfills_from_lower_priority() {
    let first = Series::new(
        vec![ts(0), ts(60), ts(120)],
        vec![Column::new("temp", vec![Some(1.0), None, Some(3.0)])],
    )
    .unwrap();
    let second = Series::new(
        vec![ts(0), ts(60), ts(120)],
        vec![Column::dense("temp", [10.0, 20.0, 30.0])],
    )
    .unwrap();
    let merged =
        merge_outer(&[NamedSeries::new("a", first), NamedSeries::new("b", second)]).unwrap();
    assert_eq!(merged.series.columns().len(), 1);
    assert_eq!(merged.series.column("temp").unwrap().values, [Some(1.0), Some(20.0), Some(3.0)]);
}

#[test]
fn no_sources_and_empty_source_fail() {
    assert!(matches!(merge_outer(&[]), Err(EnvDbError::EmptySeries { .. })));
    let empty = NamedSeries::new("a", Series::empty(["x"]));
    assert!(matches!(merge_outer(&[empty]), Err(EnvDbError::EmptySeries { .. })));
}
