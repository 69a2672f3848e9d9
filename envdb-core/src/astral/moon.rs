use chrono::NaiveDate;
use serde::Serialize;

use crate::astral::cache::{AstralDailyCache, DayEventSource};
use crate::connector::LunarEphemeris;
use crate::types::{EnvDbError, Instant, Tz};

/// Lunar phase of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonDay {
    /// Calendar day.
    pub day: NaiveDate,
    /// Phase in `[0, 28)`.
    pub phase: f64,
}

/// [`DayEventSource`] producing [`MoonDay`]s.
#[derive(Debug, Clone)]
pub struct MoonSource<L> {
    ephemeris: L,
    tz: Tz,
}

impl<L: LunarEphemeris> DayEventSource for MoonSource<L> {
    type Events = MoonDay;

    fn timezone(&self) -> Tz {
        self.tz
    }

    fn compute_day_events(&self, day: NaiveDate) -> Result<MoonDay, EnvDbError> {
        Ok(MoonDay {
            day,
            phase: self.ephemeris.moon_phase(day)?,
        })
    }
}

/// Memoized lunar phase per day.
#[derive(Debug, Clone)]
pub struct MoonEngine<L: LunarEphemeris> {
    cache: AstralDailyCache<MoonSource<L>>,
}

impl<L: LunarEphemeris> MoonEngine<L> {
    /// Engine flooring instants to days in `tz`.
    pub const fn new(ephemeris: L, tz: Tz) -> Self {
        Self {
            cache: AstralDailyCache::new(MoonSource { ephemeris, tz }),
        }
    }

    /// Phase of the instant's calendar day.
    ///
    /// # Errors
    /// Propagates ephemeris failures.
    pub fn day_info(&mut self, t: &Instant) -> Result<MoonDay, EnvDbError> {
        self.cache.day_info(t).copied()
    }

    /// Phase of `day`.
    ///
    /// # Errors
    /// Propagates ephemeris failures.
    pub fn day_info_for(&mut self, day: NaiveDate) -> Result<MoonDay, EnvDbError> {
        self.cache.day_info_for(day).copied()
    }

    /// Phase of every day in `[start, end]`.
    ///
    /// # Errors
    /// Propagates the first ephemeris failure.
    pub fn daily_in_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MoonDay>, EnvDbError> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| self.day_info_for(d))
            .collect()
    }

    /// Number of days computed so far.
    #[must_use]
    pub fn cached_days(&self) -> usize {
        self.cache.len()
    }
}
