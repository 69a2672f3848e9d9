use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use envdb_core::{Location, WeatherCacheConfig, WeatherProvider, WeatherRequest};
use envdb_middleware::CachingWeather;
use envdb_mock::MockWeather;

fn request(day: u32) -> WeatherRequest {
    let d = NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
    WeatherRequest {
        location: Location::default(),
        start: d,
        end: d,
        timezone: chrono_tz::UTC,
    }
}

#[tokio::test]
async fn second_identical_request_hits_cache() {
    let mock = MockWeather::new();
    let cached = CachingWeather::new(Arc::new(mock.clone()), &WeatherCacheConfig::default());

    let a = cached.hourly(&request(1)).await.unwrap();
    let b = cached.hourly(&request(1)).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(mock.calls(), 1, "second call should be cached");
}

#[tokio::test]
async fn key_discriminates_range_location_and_zone() {
    let mock = MockWeather::new();
    let cached = CachingWeather::new(Arc::new(mock.clone()), &WeatherCacheConfig::default());

    cached.hourly(&request(1)).await.unwrap();
    cached.hourly(&request(2)).await.unwrap();

    let mut elsewhere = request(1);
    elsewhere.location = Location::new(45.0, 5.0, 200.0);
    cached.hourly(&elsewhere).await.unwrap();

    let mut zoned = request(1);
    zoned.timezone = chrono_tz::Europe::Paris;
    cached.hourly(&zoned).await.unwrap();

    assert_eq!(mock.calls(), 4);
    cached.hourly(&request(2)).await.unwrap();
    assert_eq!(mock.calls(), 4);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let mock = MockWeather::new();
    mock.fail_next(1).await;
    let cached = CachingWeather::new(Arc::new(mock.clone()), &WeatherCacheConfig::default());

    assert!(cached.hourly(&request(1)).await.is_err());
    assert!(cached.hourly(&request(1)).await.is_ok());
    assert!(cached.hourly(&request(1)).await.is_ok());
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn ttl_expiration_causes_refetch() {
    let mock = MockWeather::new();
    let cfg = WeatherCacheConfig {
        capacity: 8,
        ttl: Some(Duration::from_millis(50)),
    };
    let cached = CachingWeather::new(Arc::new(mock.clone()), &cfg);

    cached.hourly(&request(1)).await.unwrap();
    cached.hourly(&request(1)).await.unwrap();
    assert_eq!(mock.calls(), 1);
    tokio::time::sleep(Duration::from_millis(120)).await;
    cached.hourly(&request(1)).await.unwrap();
    assert_eq!(mock.calls(), 2);
}
