//! Solar-cycle phase labels.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnvDbError;

/// Segment of the solar cycle an instant falls in.
///
/// Variants are declared in the order a day unfolds, which is also the row
/// order of the daily rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarCyclePhase {
    /// Within the half width of the morning twilight midpoint.
    Rising,
    /// Between the two twilight bands, sun up.
    Daylight,
    /// Within the half width of the evening twilight midpoint.
    Setting,
    /// Outside both bands, sun down.
    Night,
}

impl SolarCyclePhase {
    /// Every phase, in day order.
    pub const ALL: [Self; 4] = [Self::Rising, Self::Daylight, Self::Setting, Self::Night];

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Daylight => "daylight",
            Self::Setting => "setting",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for SolarCyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolarCyclePhase {
    type Err = EnvDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| EnvDbError::InvalidArg(format!("unknown solar-cycle phase: {s:?}")))
    }
}

/// Phase column of the daily rollup: one row per phase plus one `all` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhaseLabel {
    /// Row restricted to one phase.
    Phase(SolarCyclePhase),
    /// Row collapsing every phase of the day.
    All,
}

impl fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phase(p) => p.fmt(f),
            Self::All => f.write_str("all"),
        }
    }
}

impl From<SolarCyclePhase> for PhaseLabel {
    fn from(p: SolarCyclePhase) -> Self {
        Self::Phase(p)
    }
}

impl TryFrom<String> for PhaseLabel {
    type Error = EnvDbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            value.parse().map(Self::Phase)
        }
    }
}

impl From<PhaseLabel> for String {
    fn from(l: PhaseLabel) -> Self {
        l.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_puts_all_last() {
        let mut labels = vec![
            PhaseLabel::All,
            PhaseLabel::Phase(SolarCyclePhase::Night),
            PhaseLabel::Phase(SolarCyclePhase::Rising),
            PhaseLabel::Phase(SolarCyclePhase::Setting),
            PhaseLabel::Phase(SolarCyclePhase::Daylight),
        ];
        labels.sort();
        let text: Vec<String> = labels.into_iter().map(String::from).collect();
        assert_eq!(text, ["rising", "daylight", "setting", "night", "all"]);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            PhaseLabel::try_from("Night".to_string()).unwrap(),
            PhaseLabel::Phase(SolarCyclePhase::Night)
        );
        assert!(PhaseLabel::try_from("dusk".to_string()).is_err());
    }
}
