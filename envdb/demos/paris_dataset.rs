use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use envdb::{AggregationPlan, EnvDb, Frequency, RawSource, Reducer, ResamplePolicy};
use envdb_mock::MockWeather;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. Two days of synthetic observations: acoustic clicks every minute and
    //    a water temperature probe every 10 minutes.
    let start = NaiveDate::from_ymd_opt(2023, 6, 21)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or("bad start date")?;
    let minutes: Vec<_> = (0..2 * 24 * 60).map(|m| start + TimeDelta::minutes(m)).collect();
    let clicks = RawSource::new("hydrophone", minutes.iter().copied())
        .with_dense_column(
            "clicks",
            (0..minutes.len()).map(|m| f64::from(u32::try_from(m % 7).unwrap_or(0))),
        )
        .with_policy(ResamplePolicy::aggregate(Reducer::Sum));

    let probe_times: Vec<_> = minutes.iter().step_by(10).copied().collect();
    let probe = RawSource::new("probe", probe_times.iter().copied())
        .with_dense_column(
            "water_temp",
            (0..probe_times.len())
                .map(|i| 14.0 + f64::from(u32::try_from(i % 36).unwrap_or(0)) * 0.05),
        );

    // 2. Build the orchestrator for a Paris site with a 15-minute grid.
    let db = EnvDb::builder()
        .location(48.886, 2.333, 35.0)
        .timezone(chrono_tz::Europe::Paris)
        .output_frequency("15min".parse::<Frequency>()?)
        .rollup(AggregationPlan::new(Reducer::Mean).with_column("clicks", Reducer::Sum))
        .weather(Arc::new(MockWeather::new()))
        .build()?;

    // 3. Ingest, resample, align and roll up.
    let dataset = db.build_dataset(vec![clicks, probe]).await?;

    println!("columns: {:?}", dataset.raw.columns);
    println!(
        "raw rows: {}, hourly rows: {}, daily rows: {}",
        dataset.raw.len(),
        dataset.hourly.len(),
        dataset.daily.len()
    );
    println!("\n## Daily rollup");
    for row in &dataset.daily {
        let clicks = row.values[0].unwrap_or_default();
        println!(
            " - {} {:<8} hours={:>2} clicks={:>8} moon={:.1}",
            row.day, row.phase, row.hours, clicks, row.moon_phase
        );
    }
    println!("\n## Sources");
    for report in &dataset.info.sources {
        println!(
            " - {}: {} rows in, {} out, native {:?}",
            report.name, report.rows_in, report.rows_out, report.native_frequency
        );
    }
    Ok(())
}
