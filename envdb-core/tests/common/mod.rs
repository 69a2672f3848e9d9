#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone};
use envdb_core::{
    EnvDbError, Instant, Location, LunarEphemeris, SolarEphemeris, SunDay, Tz, localize,
};

/// Solar ephemeris with the same clock times every day, counting calls.
///
/// dawn 05:30, sunrise 06:00, noon 12:00, sunset 18:00, dusk 18:30,
/// midnight 00:00; twilight midpoints are 05:45 and 18:15.
#[derive(Debug, Default, Clone)]
pub struct FixedSun {
    pub calls: Arc<AtomicUsize>,
    pub fail: bool,
}

impl FixedSun {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn at(day: NaiveDate, h: u32, m: u32, tz: Tz) -> Instant {
    localize(tz, day.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap()))
}

impl SolarEphemeris for FixedSun {
    fn solar_events(&self, _: &Location, day: NaiveDate, tz: Tz) -> Result<SunDay, EnvDbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EnvDbError::undefined_event(day, "sunrise"));
        }
        Ok(SunDay {
            day,
            dawn: at(day, 5, 30, tz),
            sunrise: at(day, 6, 0, tz),
            noon: at(day, 12, 0, tz),
            sunset: at(day, 18, 0, tz),
            dusk: at(day, 18, 30, tz),
            midnight: at(day, 0, 0, tz),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct CountingMoon {
    pub calls: Arc<AtomicUsize>,
}

impl LunarEphemeris for CountingMoon {
    fn moon_phase(&self, day: NaiveDate) -> Result<f64, EnvDbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(f64::from(day.day0() % 28))
    }
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
    chrono_tz::UTC.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

pub fn ts(secs: i64) -> Instant {
    chrono_tz::UTC.timestamp_opt(secs, 0).unwrap()
}
