use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use crate::astral::cache::{AstralDailyCache, DayEventSource};
use crate::connector::SolarEphemeris;
use crate::types::{EnvDbError, Instant, Location, SolarCyclePhase, Tz};

/// Solar events of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SunDay {
    /// Calendar day the events belong to.
    pub day: NaiveDate,
    /// Civil dawn (sun 6° below the horizon, rising).
    pub dawn: Instant,
    /// Sunrise.
    pub sunrise: Instant,
    /// Solar noon.
    pub noon: Instant,
    /// Sunset.
    pub sunset: Instant,
    /// Civil dusk (sun 6° below the horizon, setting).
    pub dusk: Instant,
    /// Solar midnight.
    pub midnight: Instant,
}

impl SunDay {
    /// Twilight midpoints of the day.
    #[must_use]
    pub fn twilight(&self) -> TwilightWindow {
        TwilightWindow {
            mid_rising: self.dawn + (self.sunrise - self.dawn) / 2,
            mid_setting: self.sunset + (self.dusk - self.sunset) / 2,
        }
    }
}

/// Midpoints of the morning and evening twilights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TwilightWindow {
    /// Halfway between dawn and sunrise.
    pub mid_rising: Instant,
    /// Halfway between sunset and dusk.
    pub mid_setting: Instant,
}

impl TwilightWindow {
    /// Signed seconds from each midpoint to `t`, `(t - mid_rising, t - mid_setting)`.
    #[must_use]
    pub fn distances(&self, t: &Instant) -> (f64, f64) {
        (seconds(*t - self.mid_rising), seconds(*t - self.mid_setting))
    }
}

#[allow(clippy::cast_precision_loss)]
fn seconds(d: TimeDelta) -> f64 {
    d.num_milliseconds() as f64 / 1_000.0
}

/// Classification of one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarCycle {
    /// Phase the instant falls in.
    pub phase: SolarCyclePhase,
    /// Day the instant is attributed to; pre-dawn night belongs to the previous day.
    pub day: NaiveDate,
    /// Signed seconds since the rising twilight midpoint.
    pub dist_rising_s: f64,
    /// Signed seconds since the setting twilight midpoint.
    pub dist_setting_s: f64,
}

/// Classify `t` against the events of its calendar day.
///
/// First match wins: `|d_r| <= w` rising, `|d_s| <= w` setting,
/// `d_r > 0 && d_s < 0` daylight, otherwise night. Night before the setting
/// midpoint (pre-dawn) is attributed to the previous day.
#[must_use]
pub fn classify_with(sun: &SunDay, t: &Instant, half_width_s: f64) -> SolarCycle {
    let (d_r, d_s) = sun.twilight().distances(t);
    let phase = if d_r.abs() <= half_width_s {
        SolarCyclePhase::Rising
    } else if d_s.abs() <= half_width_s {
        SolarCyclePhase::Setting
    } else if d_r > 0.0 && d_s < 0.0 {
        SolarCyclePhase::Daylight
    } else {
        SolarCyclePhase::Night
    };
    let day = if phase == SolarCyclePhase::Night && d_s < 0.0 {
        sun.day.pred_opt().unwrap_or(sun.day)
    } else {
        sun.day
    };
    SolarCycle {
        phase,
        day,
        dist_rising_s: d_r,
        dist_setting_s: d_s,
    }
}

/// [`DayEventSource`] producing [`SunDay`]s for a fixed location and zone.
#[derive(Debug, Clone)]
pub struct SunSource<E> {
    ephemeris: E,
    location: Location,
    tz: Tz,
}

impl<E: SolarEphemeris> SunSource<E> {
    /// Bind an ephemeris to one observer.
    pub const fn new(ephemeris: E, location: Location, tz: Tz) -> Self {
        Self {
            ephemeris,
            location,
            tz,
        }
    }

    /// Observer location.
    pub const fn location(&self) -> &Location {
        &self.location
    }
}

impl<E: SolarEphemeris> DayEventSource for SunSource<E> {
    type Events = SunDay;

    fn timezone(&self) -> Tz {
        self.tz
    }

    fn compute_day_events(&self, day: NaiveDate) -> Result<SunDay, EnvDbError> {
        self.ephemeris.solar_events(&self.location, day, self.tz)
    }
}

/// Solar-cycle classifier over a per-day event cache.
#[derive(Debug, Clone)]
pub struct SunEngine<E: SolarEphemeris> {
    cache: AstralDailyCache<SunSource<E>>,
    half_width_s: f64,
}

impl<E: SolarEphemeris> SunEngine<E> {
    /// Engine for one observer with twilight half width `half_width_s`.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the half width is negative or not finite.
    pub fn new(
        ephemeris: E,
        location: Location,
        tz: Tz,
        half_width_s: f64,
    ) -> Result<Self, EnvDbError> {
        if !half_width_s.is_finite() || half_width_s < 0.0 {
            return Err(EnvDbError::InvalidArg(format!(
                "twilight half width must be a non-negative number of seconds, got {half_width_s}"
            )));
        }
        Ok(Self {
            cache: AstralDailyCache::new(SunSource::new(ephemeris, location, tz)),
            half_width_s,
        })
    }

    /// Twilight half width in seconds.
    #[must_use]
    pub const fn half_width_s(&self) -> f64 {
        self.half_width_s
    }

    /// Classify an instant.
    ///
    /// # Errors
    /// Propagates ephemeris failures for the instant's day.
    pub fn classify(&mut self, t: &Instant) -> Result<SolarCycle, EnvDbError> {
        let hw = self.half_width_s;
        let sun = self.cache.day_info(t)?;
        Ok(classify_with(sun, t, hw))
    }

    /// Twilight midpoints of the instant's day.
    ///
    /// # Errors
    /// Propagates ephemeris failures for the instant's day.
    pub fn twilight(&mut self, t: &Instant) -> Result<TwilightWindow, EnvDbError> {
        Ok(self.cache.day_info(t)?.twilight())
    }

    /// Events of the instant's calendar day.
    ///
    /// # Errors
    /// Propagates ephemeris failures for the instant's day.
    pub fn day_info(&mut self, t: &Instant) -> Result<SunDay, EnvDbError> {
        self.cache.day_info(t).copied()
    }

    /// Events of `day`.
    ///
    /// # Errors
    /// Propagates ephemeris failures for `day`.
    pub fn day_info_for(&mut self, day: NaiveDate) -> Result<SunDay, EnvDbError> {
        self.cache.day_info_for(day).copied()
    }

    /// Events of every day in `[start, end]`.
    ///
    /// # Errors
    /// Propagates the first ephemeris failure.
    pub fn daily_in_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SunDay>, EnvDbError> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| self.day_info_for(d))
            .collect()
    }

    /// The underlying day cache.
    pub const fn cache(&self) -> &AstralDailyCache<SunSource<E>> {
        &self.cache
    }
}
