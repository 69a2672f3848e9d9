//! Sampling cadence expressed as a fixed number of seconds.

use core::fmt;
use core::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::EnvDbError;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

/// A strictly positive sampling interval.
///
/// Parses pandas-style aliases with an optional integer multiplier:
/// `"s"`, `"min"` (or `"T"`), `"h"` (or `"H"`), `"d"` (or `"D"`), e.g.
/// `"15min"`, `"2h"`. Serializes back to the canonical alias.
///
/// ```
/// use envdb_types::Frequency;
///
/// let f: Frequency = "15min".parse().unwrap();
/// assert_eq!(f.seconds(), 900);
/// assert_eq!(f.to_string(), "15min");
/// assert_eq!(Frequency::HOUR.to_string(), "h");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency(i64);

impl Frequency {
    /// One second.
    pub const SECOND: Self = Self(1);
    /// One minute.
    pub const MINUTE: Self = Self(MINUTE);
    /// One hour.
    pub const HOUR: Self = Self(HOUR);
    /// One calendar day.
    pub const DAY: Self = Self(DAY);

    /// Build a frequency from a number of seconds.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `seconds` is not strictly positive.
    pub fn from_seconds(seconds: i64) -> Result<Self, EnvDbError> {
        if seconds <= 0 {
            return Err(EnvDbError::InvalidArg(format!(
                "frequency must be positive, got {seconds}s"
            )));
        }
        Ok(Self(seconds))
    }

    /// Number of seconds in one step.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.0
    }

    /// Step as a `chrono::TimeDelta`.
    #[must_use]
    pub const fn as_delta(self) -> TimeDelta {
        TimeDelta::seconds(self.0)
    }

    /// True when one step is a whole number of calendar days.
    #[must_use]
    pub const fn is_calendar_days(self) -> bool {
        self.0 % DAY == 0
    }

    /// How many steps of `finer` fit in one step of `self` (floored).
    #[must_use]
    pub const fn ratio(self, finer: Self) -> i64 {
        self.0 / finer.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, unit) = if self.0 % DAY == 0 {
            (self.0 / DAY, "d")
        } else if self.0 % HOUR == 0 {
            (self.0 / HOUR, "h")
        } else if self.0 % MINUTE == 0 {
            (self.0 / MINUTE, "min")
        } else {
            (self.0, "s")
        };
        if n == 1 {
            f.write_str(unit)
        } else {
            write!(f, "{n}{unit}")
        }
    }
}

impl FromStr for Frequency {
    type Err = EnvDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);
        let n: i64 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| EnvDbError::InvalidArg(format!("invalid frequency: {s:?}")))?
        };
        let unit_seconds = match unit {
            "s" | "S" | "sec" => 1,
            "min" | "T" | "m" => MINUTE,
            "h" | "H" => HOUR,
            "d" | "D" => DAY,
            _ => {
                return Err(EnvDbError::InvalidArg(format!(
                    "unknown frequency unit in {s:?}"
                )));
            }
        };
        Self::from_seconds(n.saturating_mul(unit_seconds))
    }
}

impl TryFrom<String> for Frequency {
    type Error = EnvDbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_and_multipliers() {
        assert_eq!("min".parse::<Frequency>().unwrap(), Frequency::MINUTE);
        assert_eq!("T".parse::<Frequency>().unwrap(), Frequency::MINUTE);
        assert_eq!("H".parse::<Frequency>().unwrap(), Frequency::HOUR);
        assert_eq!("2d".parse::<Frequency>().unwrap().seconds(), 2 * DAY);
        assert_eq!("90s".parse::<Frequency>().unwrap().to_string(), "90s");
        assert_eq!("90min".parse::<Frequency>().unwrap().to_string(), "90min");
    }

    #[test]
    fn rejects_zero_and_unknown_units() {
        assert!(matches!(
            "0min".parse::<Frequency>(),
            Err(EnvDbError::InvalidArg(_))
        ));
        assert!(matches!(
            "3w".parse::<Frequency>(),
            Err(EnvDbError::InvalidArg(_))
        ));
    }
}
