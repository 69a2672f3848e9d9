use chrono::{Datelike, NaiveDate, TimeDelta};
use solar_positioning::time::DeltaT;
use solar_positioning::types::SunriseResult;
use solar_positioning::{Horizon, spa};

use crate::astral::sun::SunDay;
use crate::connector::{LunarEphemeris, SolarEphemeris};
use crate::normalize::day_start;
use crate::types::{EnvDbError, Instant, Location, Tz};

const SYNODIC_MONTH: f64 = 29.530_588_853;
/// Julian day of the 2000-01-06 new moon.
const REFERENCE_NEW_MOON: f64 = 2_451_550.1;
/// `num_days_from_ce` of 2000-01-01.
const J2000_DAYS_FROM_CE: i32 = 730_120;

/// Built-in ephemeris: NREL SPA for the Sun, mean synodic month for the Moon.
///
/// Sunrise and sunset use the standard refracted horizon, dawn and dusk the
/// civil twilight horizon. Solar midnight is the anti-transit falling on the
/// requested day. The observer's elevation is not applied.
///
/// ```
/// use chrono::{NaiveDate, Timelike};
/// use envdb_core::{Location, SolarEphemeris, Spa};
///
/// let paris = Location::new(48.886, 2.333, 35.0);
/// let day = NaiveDate::from_ymd_opt(2023, 6, 21).unwrap();
/// let sun = Spa.solar_events(&paris, day, chrono_tz::Europe::Paris).unwrap();
/// assert_eq!(sun.sunrise.hour(), 5);
/// assert_eq!(sun.sunset.hour(), 21);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spa;

/// Rise, transit and set of `day` for one horizon.
fn crossings(
    loc: &Location,
    day: NaiveDate,
    tz: Tz,
    horizon: Horizon,
    events: (&str, &str),
) -> Result<(Instant, Instant, Instant), EnvDbError> {
    let delta_t = DeltaT::estimate_from_date(day.year(), day.month())
        .map_err(|e| EnvDbError::InvalidArg(format!("delta T for {day}: {e}")))?;
    let res = spa::sunrise_sunset_for_horizon(
        day_start(day, tz),
        loc.latitude,
        loc.longitude,
        delta_t,
        horizon,
    )
    .map_err(|e| EnvDbError::InvalidArg(format!("solar position for {day}: {e}")))?;
    match res {
        SunriseResult::RegularDay {
            sunrise,
            transit,
            sunset,
        } => Ok((sunrise, transit, sunset)),
        SunriseResult::AllDay { .. } => Err(EnvDbError::undefined_event(day, events.1)),
        SunriseResult::AllNight { .. } => Err(EnvDbError::undefined_event(day, events.0)),
    }
}

/// Anti-transit on the same local date as `noon`.
fn anti_transit(noon: Instant) -> Instant {
    let before = noon - TimeDelta::hours(12);
    if before.date_naive() == noon.date_naive() {
        before
    } else {
        noon + TimeDelta::hours(12)
    }
}

impl SolarEphemeris for Spa {
    fn solar_events(
        &self,
        location: &Location,
        day: NaiveDate,
        tz: Tz,
    ) -> Result<SunDay, EnvDbError> {
        let (sunrise, noon, sunset) = crossings(
            location,
            day,
            tz,
            Horizon::SunriseSunset,
            ("sunrise", "sunset"),
        )?;
        let (dawn, _, dusk) =
            crossings(location, day, tz, Horizon::CivilTwilight, ("dawn", "dusk"))?;
        Ok(SunDay {
            day,
            dawn,
            sunrise,
            noon,
            sunset,
            dusk,
            midnight: anti_transit(noon),
        })
    }
}

impl LunarEphemeris for Spa {
    fn moon_phase(&self, day: NaiveDate) -> Result<f64, EnvDbError> {
        let jd = f64::from(day.num_days_from_ce() - J2000_DAYS_FROM_CE) + 2_451_544.5;
        let age = (jd - REFERENCE_NEW_MOON).rem_euclid(SYNODIC_MONTH);
        let phase = age / SYNODIC_MONTH * 28.0;
        Ok(if phase >= 28.0 { 0.0 } else { phase })
    }
}
