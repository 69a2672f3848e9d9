mod helpers;

use std::collections::BTreeMap;

use envdb::{Frequency, PhaseLabel, RawSource, SolarCyclePhase};
use helpers::{MOON, at, builder, day, every};
use proptest::prelude::*;

#[tokio::test]
async fn all_row_is_not_a_mean_of_phase_means() {
    // 9 daylight hours (08:00..=16:00) of 10 and 4 night hours (20:00..=23:00) of 2.
    let mut dates = every(at(1, 8, 0), 60, 9);
    dates.extend(every(at(1, 20, 0), 60, 4));
    let mut counts = vec![10.0; 9];
    counts.extend([2.0; 4]);
    let src = RawSource::new("hydrophone", dates).with_dense_column("clicks", counts);

    let db = builder(Frequency::HOUR).build().unwrap();
    let ds = db.build_dataset(vec![src]).await.unwrap();

    let labels: Vec<PhaseLabel> = ds.daily.iter().map(|r| r.phase).collect();
    assert_eq!(
        labels,
        [
            PhaseLabel::Phase(SolarCyclePhase::Daylight),
            PhaseLabel::Phase(SolarCyclePhase::Night),
            PhaseLabel::All,
        ]
    );
    let all = &ds.daily.rows[2];
    assert_eq!(all.day, day(1));
    assert_eq!(all.samples, 13);
    assert_eq!(all.hours, 13);
    assert_eq!(all.values[0], Some(7.231));
    assert_eq!(ds.daily.rows[0].values[0], Some(10.0));
    assert_eq!(ds.daily.rows[1].values[0], Some(2.0));

    for row in &ds.daily {
        assert_eq!(row.sun.day, day(1));
        assert!((row.moon_phase - MOON).abs() < f64::EPSILON);
    }
    assert_eq!(ds.astral_daily.len(), 1);
    assert_eq!(ds.hourly.len(), 13, "hourly output passes through");
}

#[tokio::test]
async fn night_after_midnight_joins_previous_evening() {
    // 22:00 .. 03:00 hourly: one night segment spanning two calendar dates.
    let dates = every(at(1, 22, 0), 60, 6);
    let src = RawSource::new("probe", dates)
        .with_dense_column("temp", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    let ds = builder(Frequency::HOUR).build().unwrap().build_dataset(vec![src]).await.unwrap();

    assert!(ds.raw.iter().all(|r| r.suncycle.day == day(1)));
    assert_eq!(ds.daily.len(), 2);
    assert_eq!(ds.daily.rows[0].phase, PhaseLabel::Phase(SolarCyclePhase::Night));
    assert_eq!(ds.daily.rows[0].values[0], Some(3.5));
    // astral context covers the solar-cycle day and every calendar day touched
    let days: Vec<_> = ds.astral_daily.iter().map(|a| a.day).collect();
    assert_eq!(days, [day(1), day(2)]);
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / f64::from(u32::try_from(v.len()).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn all_rows_match_direct_mean(values in prop::collection::vec(0u16..1_000, 72)) {
        let dates = every(at(1, 0, 0), 60, values.len());
        let raw: Vec<f64> = values.iter().map(|v| f64::from(*v) / 10.0).collect();
        let src = RawSource::new("probe", dates).with_dense_column("x", raw.clone());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let ds = rt
            .block_on(builder(Frequency::HOUR).build().unwrap().build_dataset(vec![src]))
            .unwrap();

        let mut by_day: BTreeMap<chrono::NaiveDate, Vec<f64>> = BTreeMap::new();
        for (row, v) in ds.raw.iter().zip(&raw) {
            by_day.entry(row.suncycle.day).or_default().push(*v);
        }
        let all_rows: Vec<_> = ds.daily.iter().filter(|r| r.phase == PhaseLabel::All).collect();
        prop_assert_eq!(all_rows.len(), by_day.len());
        for row in all_rows {
            let expected = mean(&by_day[&row.day]);
            prop_assert!((row.values[0].unwrap() - expected).abs() < 1e-3 + f64::EPSILON);
        }
    }
}
