use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDate;

use crate::types::{EnvDbError, Instant, Tz};

/// Something that computes the fixed astronomical events of one calendar day.
///
/// The source owns every parameter besides the day (observer location,
/// timezone), so one cache instance never mixes locations.
pub trait DayEventSource {
    /// Named values for one day.
    type Events: Clone;

    /// Zone used to floor instants to their calendar day.
    fn timezone(&self) -> Tz;

    /// Compute the events of `day`.
    ///
    /// # Errors
    /// Propagates ephemeris failures such as `UndefinedAstralEvent`.
    fn compute_day_events(&self, day: NaiveDate) -> Result<Self::Events, EnvDbError>;
}

/// At-most-once-per-day memoization of a [`DayEventSource`].
///
/// Entries are never evicted: the number of days is bounded by the span of
/// the data being enriched. Failed computations are not cached.
#[derive(Debug, Clone)]
pub struct AstralDailyCache<S: DayEventSource> {
    source: S,
    days: BTreeMap<NaiveDate, S::Events>,
}

impl<S: DayEventSource> AstralDailyCache<S> {
    /// Empty cache over `source`.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            days: BTreeMap::new(),
        }
    }

    /// Events of the calendar day containing `t`, in the source's zone.
    ///
    /// # Errors
    /// Propagates the source's failure for a day not cached yet.
    pub fn day_info(&mut self, t: &Instant) -> Result<&S::Events, EnvDbError> {
        let day = t.with_timezone(&self.source.timezone()).date_naive();
        self.day_info_for(day)
    }

    /// Events of `day`, computed on first request.
    ///
    /// # Errors
    /// Propagates the source's failure for a day not cached yet.
    pub fn day_info_for(&mut self, day: NaiveDate) -> Result<&S::Events, EnvDbError> {
        match self.days.entry(day) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(v) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(%day, "computing astral day");
                let events = self.source.compute_day_events(day)?;
                Ok(v.insert(events))
            }
        }
    }

    /// Events of `day` if already computed.
    #[must_use]
    pub fn cached(&self, day: NaiveDate) -> Option<&S::Events> {
        self.days.get(&day)
    }

    /// Number of cached days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when nothing has been computed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The wrapped event source.
    pub const fn source(&self) -> &S {
        &self.source
    }
}
