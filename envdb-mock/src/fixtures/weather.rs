use std::f64::consts::PI;

use chrono::{TimeDelta, Timelike};
use envdb_core::{Column, HOURLY_VARIABLES, Series, WeatherRequest, day_start};

/// Hourly weather for every hour of `req.start..=req.end` in `req.timezone`.
///
/// Values depend only on the local hour of day:
/// - `temperature_2m` peaks at 18 C at 15:00 and bottoms at 6 C at 03:00.
/// - `precipitation` and `rain` are 0.2 mm every sixth hour, 0 otherwise.
/// - `soil_moisture_0_to_7cm` is a constant 0.3.
#[must_use]
pub fn hourly_fixture(req: &WeatherRequest) -> Series {
    let tz = req.timezone;
    let start = day_start(req.start, tz);
    let end = req
        .end
        .succ_opt()
        .map_or_else(|| start + TimeDelta::days(1), |d| day_start(d, tz));

    let mut timestamps = Vec::new();
    let mut t = start;
    while t < end {
        timestamps.push(t);
        t += TimeDelta::hours(1);
    }

    let columns: Vec<Column> = HOURLY_VARIABLES
        .iter()
        .map(|name| Column::dense(*name, timestamps.iter().map(|t| value(name, t.hour()))))
        .collect();

    Series::new(timestamps, columns).unwrap_or_else(|_| Series::empty(HOURLY_VARIABLES))
}

fn value(variable: &str, hour: u32) -> f64 {
    let h = f64::from(hour);
    let wave = |shift: f64| (2.0 * PI * (h - 9.0 - shift) / 24.0).sin();
    match variable {
        "temperature_2m" => 12.0 + 6.0 * wave(0.0),
        "relative_humidity_2m" => 70.0 - 20.0 * wave(0.0),
        "precipitation" | "rain" if hour % 6 == 0 => 0.2,
        "precipitation" | "rain" => 0.0,
        "cloud_cover" => f64::from((hour * 4) % 100),
        "et0_fao_evapotranspiration" => (0.1 * wave(0.0)).max(0.0),
        "soil_temperature_0_to_7cm" => 11.0 + 3.0 * wave(2.0),
        _ => 0.3,
    }
}
