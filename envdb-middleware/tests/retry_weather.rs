use std::sync::Arc;

use chrono::NaiveDate;
use envdb_core::{
    BackoffConfig, EnvDbError, Location, RetryConfig, WeatherCacheConfig, WeatherProvider,
    WeatherRequest,
};
use envdb_middleware::{RetryingWeather, WeatherBuilder};
use envdb_mock::{MockWeather, WeatherBehavior};

fn request() -> WeatherRequest {
    let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    WeatherRequest {
        location: Location::default(),
        start: d,
        end: d,
        timezone: chrono_tz::UTC,
    }
}

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        backoff: BackoffConfig {
            min_backoff_ms: 1,
            max_backoff_ms: 4,
            factor: 2,
            jitter_percent: 0,
        },
    }
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let mock = MockWeather::new();
    mock.fail_next(3).await;
    let retrying = RetryingWeather::new(Arc::new(mock.clone()), fast_retry(5));

    let series = retrying.hourly(&request()).await.expect("recovers");
    assert_eq!(series.len(), 24);
    assert_eq!(mock.calls(), 4);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let mock = MockWeather::new();
    mock.fail_next(10).await;
    let retrying = RetryingWeather::new(Arc::new(mock.clone()), fast_retry(5));

    let err = retrying.hourly(&request()).await.unwrap_err();
    assert!(matches!(err, EnvDbError::Provider { .. }));
    assert_eq!(mock.calls(), 5);
}

#[tokio::test]
async fn non_retryable_errors_fail_fast() {
    let mock = MockWeather::with_behavior(
        "archive",
        WeatherBehavior::Fail(EnvDbError::InvalidArg("bad range".into())),
    );
    let retrying = RetryingWeather::new(Arc::new(mock.clone()), fast_retry(5));

    let err = retrying.hourly(&request()).await.unwrap_err();
    assert_eq!(err, EnvDbError::InvalidArg("bad range".into()));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn builder_puts_cache_outside_retry() {
    let mock = MockWeather::new();
    mock.fail_next(2).await;
    let builder = WeatherBuilder::new(Arc::new(mock.clone()))
        .with_retry(&fast_retry(5))
        .with_cache(&WeatherCacheConfig::default());
    assert_eq!(builder.layer_names(), ["CachingWeather", "RetryingWeather"]);
    let provider = builder.build();

    assert_eq!(provider.name(), "envdb-mock");
    provider.hourly(&request()).await.unwrap();
    provider.hourly(&request()).await.unwrap();
    assert_eq!(mock.calls(), 3, "two failures, one success, then a cache hit");
}

#[tokio::test]
async fn bare_builder_is_pass_through() {
    let mock = MockWeather::new();
    let provider = WeatherBuilder::new(Arc::new(mock.clone()))
        .with_cache(&WeatherCacheConfig::default())
        .without_cache()
        .build();
    provider.hourly(&request()).await.unwrap();
    provider.hourly(&request()).await.unwrap();
    assert_eq!(mock.calls(), 2);
}
