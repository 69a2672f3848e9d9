use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::astral::SunDay;
use crate::series::Series;
use crate::types::{EnvDbError, Location, Tz};

/// Hourly variables requested from the weather archive, in column order.
pub const HOURLY_VARIABLES: [&str; 8] = [
    "temperature_2m",
    "relative_humidity_2m",
    "precipitation",
    "rain",
    "cloud_cover",
    "et0_fao_evapotranspiration",
    "soil_temperature_0_to_7cm",
    "soil_moisture_0_to_7cm",
];

/// Query for the weather archive: hourly variables over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherRequest {
    /// Observation site.
    pub location: Location,
    /// First day requested.
    pub start: NaiveDate,
    /// Last day requested (inclusive).
    pub end: NaiveDate,
    /// Zone the returned hourly timestamps are labeled with.
    pub timezone: Tz,
}

/// Focused role trait for the external weather archive.
///
/// Implementations are assumed idempotent for a fixed request; callers issue
/// one request per covering date range rather than one per row.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Stable provider name used in error messages and logs.
    fn name(&self) -> &'static str;

    /// Fetch hourly meteorological variables for the request.
    async fn hourly(&self, req: &WeatherRequest) -> Result<Series, EnvDbError>;
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn hourly(&self, req: &WeatherRequest) -> Result<Series, EnvDbError> {
        (**self).hourly(req).await
    }
}

/// Solar event function set: one batched call per (location, day).
pub trait SolarEphemeris: Send + Sync {
    /// Dawn, sunrise, noon, sunset, dusk and solar midnight of `day`,
    /// labeled with `tz`.
    ///
    /// # Errors
    /// Returns `UndefinedAstralEvent` when the sun never crosses the
    /// required altitude that day at this location.
    fn solar_events(&self, location: &Location, day: NaiveDate, tz: Tz)
    -> Result<SunDay, EnvDbError>;
}

impl<T: SolarEphemeris + ?Sized> SolarEphemeris for Arc<T> {
    fn solar_events(
        &self,
        location: &Location,
        day: NaiveDate,
        tz: Tz,
    ) -> Result<SunDay, EnvDbError> {
        (**self).solar_events(location, day, tz)
    }
}

/// Lunar phase function: a pure function of the calendar day.
pub trait LunarEphemeris: Send + Sync {
    /// Phase in `[0, 28)`: 0 new moon, 7 first quarter, 14 full, 21 last quarter.
    ///
    /// # Errors
    /// Implementation-defined.
    fn moon_phase(&self, day: NaiveDate) -> Result<f64, EnvDbError>;
}

impl<T: LunarEphemeris + ?Sized> LunarEphemeris for Arc<T> {
    fn moon_phase(&self, day: NaiveDate) -> Result<f64, EnvDbError> {
        (**self).moon_phase(day)
    }
}
