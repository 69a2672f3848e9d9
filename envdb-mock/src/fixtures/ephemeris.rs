use chrono::{Datelike, NaiveDate, NaiveTime};
use envdb_core::{EnvDbError, Location, LunarEphemeris, SolarEphemeris, SunDay, Tz, localize};

/// Solar ephemeris answering the same wall-clock times every day.
///
/// Defaults: dawn 05:30, sunrise 06:00, noon 12:00, sunset 18:00, dusk 18:30
/// and solar midnight 00:00. Twilight midpoints are therefore 05:45 and 18:15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSun {
    /// Civil dawn.
    pub dawn: NaiveTime,
    /// Sunrise.
    pub sunrise: NaiveTime,
    /// Solar noon.
    pub noon: NaiveTime,
    /// Sunset.
    pub sunset: NaiveTime,
    /// Civil dusk.
    pub dusk: NaiveTime,
    /// Solar midnight.
    pub midnight: NaiveTime,
}

const fn hm(h: u32, m: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(h, m, 0) {
        Some(t) => t,
        None => NaiveTime::MIN,
    }
}

impl Default for FixedSun {
    fn default() -> Self {
        Self {
            dawn: hm(5, 30),
            sunrise: hm(6, 0),
            noon: hm(12, 0),
            sunset: hm(18, 0),
            dusk: hm(18, 30),
            midnight: NaiveTime::MIN,
        }
    }
}

impl SolarEphemeris for FixedSun {
    fn solar_events(&self, _: &Location, day: NaiveDate, tz: Tz) -> Result<SunDay, EnvDbError> {
        let at = |t: NaiveTime| localize(tz, day.and_time(t));
        Ok(SunDay {
            day,
            dawn: at(self.dawn),
            sunrise: at(self.sunrise),
            noon: at(self.noon),
            sunset: at(self.sunset),
            dusk: at(self.dusk),
            midnight: at(self.midnight),
        })
    }
}

/// Lunar ephemeris returning a fixed phase, or a phase that advances by one
/// unit per day of the month when `phase` is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedMoon {
    /// Constant phase in `[0, 28)`.
    pub phase: Option<f64>,
}

impl LunarEphemeris for FixedMoon {
    fn moon_phase(&self, day: NaiveDate) -> Result<f64, EnvDbError> {
        Ok(self.phase.unwrap_or_else(|| f64::from(day.day0() % 28)))
    }
}
