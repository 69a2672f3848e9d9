mod common;

use chrono::NaiveDate;
use common::{CountingMoon, FixedSun, utc};
use envdb_core::{Location, MoonEngine, SunEngine};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[test]
fn solar_cycle_serializes_with_lowercase_phase() {
    let mut engine =
        SunEngine::new(FixedSun::default(), Location::default(), chrono_tz::UTC, 5_400.0).unwrap();
    let cycle = engine.classify(&utc(2024, 5, 1, 12, 0, 0)).unwrap();

    let json = serde_json::to_value(cycle).unwrap();
    assert_eq!(json["phase"], "daylight");
    assert_eq!(json["day"], "2024-05-01");
    // 12:00 is 6h15 after the 05:45 rising midpoint
    assert_eq!(json["dist_rising_s"], 22_500.0);
    assert_eq!(json["dist_setting_s"], -22_500.0);
}

#[test]
fn sun_day_serializes_every_event() {
    let mut engine =
        SunEngine::new(FixedSun::default(), Location::default(), chrono_tz::UTC, 5_400.0).unwrap();
    let sun = engine.day_info_for(day()).unwrap();

    let json = serde_json::to_value(sun).unwrap();
    assert_eq!(json["day"], "2024-05-01");
    for key in ["dawn", "sunrise", "noon", "sunset", "dusk", "midnight"] {
        let text = json[key].as_str().unwrap_or_default();
        assert!(text.starts_with("2024-05-01T"), "{key}: {text}");
    }
    assert!(json["sunrise"].as_str().unwrap().starts_with("2024-05-01T06:00:00"));
}

#[test]
fn moon_day_serializes_phase() {
    let mut engine = MoonEngine::new(CountingMoon::default(), chrono_tz::UTC);
    let moon = engine.day_info_for(day()).unwrap();

    let json = serde_json::to_value(moon).unwrap();
    assert_eq!(json["day"], "2024-05-01");
    assert_eq!(json["phase"], 0.0);
}
