//! Astronomical enrichment.
//!
//! - `cache`: at-most-once-per-day memoization generic over the event source
//! - `sun`: solar events, twilight midpoints and the solar-cycle classifier
//! - `moon`: lunar phase per day
//! - `spa`: built-in ephemeris backed by the NREL solar position algorithm
/// Per-day memoization shared by the Sun and Moon engines.
pub mod cache;
/// Lunar phase engine.
pub mod moon;
/// Built-in ephemeris.
pub mod spa;
/// Solar events and solar-cycle classification.
pub mod sun;

pub use cache::{AstralDailyCache, DayEventSource};
pub use moon::{MoonDay, MoonEngine, MoonSource};
pub use spa::Spa;
pub use sun::{SolarCycle, SunDay, SunEngine, SunSource, TwilightWindow, classify_with};
