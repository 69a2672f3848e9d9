use chrono::offset::LocalResult;
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::types::{EnvDbConfig, EnvDbError, Instant};

/// A date value as handed over by a tabular source reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDate {
    /// Text, parsed with an explicit or default `strftime` format.
    Text(String),
    /// Wall-clock timestamp without zone.
    Naive(NaiveDateTime),
    /// Calendar date, taken at local midnight.
    Date(NaiveDate),
    /// UTC timestamp.
    Utc(DateTime<Utc>),
    /// Timestamp with a fixed offset.
    Fixed(DateTime<FixedOffset>),
    /// Timestamp already carrying an IANA zone.
    Zoned(DateTime<Tz>),
}

impl From<&str> for RawDate {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawDate {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDateTime> for RawDate {
    fn from(v: NaiveDateTime) -> Self {
        Self::Naive(v)
    }
}

impl From<NaiveDate> for RawDate {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<DateTime<Utc>> for RawDate {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Utc(v)
    }
}

impl From<DateTime<FixedOffset>> for RawDate {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Self::Fixed(v)
    }
}

impl From<DateTime<Tz>> for RawDate {
    fn from(v: DateTime<Tz>) -> Self {
        Self::Zoned(v)
    }
}

/// Turns raw date values into [`Instant`]s labeled with one timezone.
///
/// Values carrying another zone, or none, are **relabeled**: the wall-clock
/// reading is kept and interpreted in the configured zone. This is not a
/// conversion; `12:00+00:00` normalized under `Europe/Paris` becomes
/// `12:00+02:00` in summer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNormalizer {
    tz: Tz,
    default_format: String,
}

impl DateNormalizer {
    /// Normalizer for `tz` that parses text with `default_format` unless told otherwise.
    pub fn new(tz: Tz, default_format: impl Into<String>) -> Self {
        Self {
            tz,
            default_format: default_format.into(),
        }
    }

    /// Normalizer built from the orchestrator configuration.
    #[must_use]
    pub fn from_config(cfg: &EnvDbConfig) -> Self {
        Self::new(cfg.timezone, cfg.date_format.clone())
    }

    /// Canonical timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Default text format.
    #[must_use]
    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    /// Normalize one value.
    ///
    /// Text is tried, in order, as a datetime with offset, a naive datetime,
    /// then a bare date, all against the same format string.
    ///
    /// # Errors
    /// Returns `InvalidDateFormat` when text does not match the format.
    pub fn normalize(
        &self,
        value: impl Into<RawDate>,
        format: Option<&str>,
    ) -> Result<Instant, EnvDbError> {
        match value.into() {
            RawDate::Text(s) => self.parse_text(&s, format.unwrap_or(&self.default_format)),
            RawDate::Naive(n) => Ok(localize(self.tz, n)),
            RawDate::Date(d) => Ok(day_start(d, self.tz)),
            RawDate::Utc(dt) => Ok(localize(self.tz, dt.naive_utc())),
            RawDate::Fixed(dt) => Ok(localize(self.tz, dt.naive_local())),
            RawDate::Zoned(dt) if dt.timezone() == self.tz => Ok(dt),
            RawDate::Zoned(dt) => Ok(localize(self.tz, dt.naive_local())),
        }
    }

    fn parse_text(&self, text: &str, format: &str) -> Result<Instant, EnvDbError> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Ok(localize(self.tz, dt.naive_local()));
        }
        if let Ok(n) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(localize(self.tz, n));
        }
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return Ok(day_start(d, self.tz));
        }
        Err(EnvDbError::invalid_date(text, format))
    }
}

/// Interpret a wall-clock reading in `tz`.
///
/// The earlier instant wins in a fall-back overlap. A reading inside a
/// spring-forward gap is shifted forward by the gap length.
#[must_use]
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Instant {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let before = naive - TimeDelta::days(1);
            let offset = tz.offset_from_utc_datetime(&before).fix().local_minus_utc();
            tz.from_utc_datetime(&(naive - TimeDelta::seconds(i64::from(offset))))
        }
    }
}

/// Calendar day of an instant in its own zone.
#[must_use]
pub fn day_key(t: &Instant) -> NaiveDate {
    t.date_naive()
}

/// First instant of `day` in `tz` (local midnight, or the first valid
/// instant when midnight falls in a DST gap).
#[must_use]
pub fn day_start(day: NaiveDate, tz: Tz) -> Instant {
    localize(tz, day.and_time(NaiveTime::MIN))
}
