#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use envdb::{EnvDbBuilder, Frequency};
use envdb_mock::{FixedMoon, FixedSun};

/// Moon phase reported by [`builder`] for every day.
pub const MOON: f64 = 3.5;

/// UTC builder with fixed-clock ephemerides (twilight midpoints 05:45 and 18:15).
pub fn builder(output: Frequency) -> EnvDbBuilder {
    EnvDbBuilder::new()
        .timezone(envdb::Tz::UTC)
        .output_frequency(output)
        .solar_ephemeris(Arc::new(FixedSun::default()))
        .lunar_ephemeris(Arc::new(FixedMoon { phase: Some(MOON) }))
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

pub fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    day(d).and_hms_opt(h, m, 0).unwrap()
}

/// `n` wall-clock readings `step_min` minutes apart.
pub fn every(start: NaiveDateTime, step_min: i64, n: usize) -> Vec<NaiveDateTime> {
    (0..n)
        .map(|i| start + TimeDelta::minutes(step_min * i64::try_from(i).unwrap()))
        .collect()
}
