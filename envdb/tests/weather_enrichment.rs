mod helpers;

use std::sync::Arc;

use envdb::{
    BackoffConfig, EnvDbError, Frequency, HOURLY_VARIABLES, RawSource, RetryConfig, WeatherRequest,
};
use envdb_mock::{MockWeather, WeatherBehavior, hourly_fixture};
use helpers::{at, builder, day, every};

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

fn probe() -> RawSource {
    RawSource::new("probe", every(at(1, 0, 0), 15, 12)).with_dense_column("temp", [10.0; 12])
}

#[tokio::test]
async fn each_row_gets_its_covering_hour() {
    let mock = MockWeather::new();
    let db = builder(Frequency::from_seconds(900).unwrap())
        .weather(Arc::new(mock.clone()))
        .build()
        .unwrap();
    let ds = db.build_dataset(vec![probe()]).await.unwrap();

    assert_eq!(mock.calls(), 1);
    let req = mock.requests().await[0];
    assert_eq!((req.start, req.end), (day(1), day(1)));

    let mut expected_columns = vec!["temp".to_string()];
    expected_columns.extend(HOURLY_VARIABLES.iter().map(|v| (*v).to_string()));
    assert_eq!(ds.raw.columns, expected_columns);

    let fixture = hourly_fixture(&WeatherRequest {
        location: db.config().location,
        start: day(1),
        end: day(1),
        timezone: db.config().timezone,
    });
    let hour_one = fixture.column("temperature_2m").unwrap().values[1].unwrap();
    // row 5 is 01:15
    let got = ds.raw.value(5, "temperature_2m").unwrap();
    assert!((got - hour_one).abs() < 1e-3);
    assert_eq!(ds.raw.value(5, "temp"), Some(10.0));
}

#[tokio::test]
async fn repeated_runs_hit_the_response_cache() {
    let mock = MockWeather::new();
    let db = builder(Frequency::from_seconds(900).unwrap())
        .weather(Arc::new(mock.clone()))
        .build()
        .unwrap();

    db.build_dataset(vec![probe()]).await.unwrap();
    db.build_dataset(vec![probe()]).await.unwrap();
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let mock = MockWeather::new();
    mock.fail_next(2).await;
    let db = builder(Frequency::from_seconds(900).unwrap())
        .weather(Arc::new(mock.clone()))
        .weather_retry(fast_retry(4))
        .build()
        .unwrap();

    let ds = db.build_dataset(vec![probe()]).await.unwrap();
    assert_eq!(mock.calls(), 3);
    assert!(ds.raw.column_index("cloud_cover").is_some());
}

#[tokio::test]
async fn persistent_failure_aborts_the_run() {
    let mock = MockWeather::with_behavior(
        "archive",
        WeatherBehavior::Fail(EnvDbError::provider("archive", "service unavailable")),
    );
    let db = builder(Frequency::from_seconds(900).unwrap())
        .weather(Arc::new(mock.clone()))
        .weather_retry(fast_retry(2))
        .build()
        .unwrap();

    let err = db.build_dataset(vec![probe()]).await.unwrap_err();
    assert!(matches!(err, EnvDbError::Provider { .. }), "got {err:?}");
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn source_columns_shadow_weather_columns() {
    let mock = MockWeather::new();
    let src = RawSource::new("station", every(at(1, 0, 0), 60, 3))
        .with_dense_column("temperature_2m", [-5.0, -5.0, -5.0]);
    let ds = builder(Frequency::HOUR)
        .weather(Arc::new(mock))
        .build()
        .unwrap()
        .build_dataset(vec![src])
        .await
        .unwrap();

    assert_eq!(ds.raw.columns.iter().filter(|c| *c == "temperature_2m").count(), 1);
    assert_eq!(ds.raw.columns.len(), HOURLY_VARIABLES.len());
    assert_eq!(ds.raw.value(1, "temperature_2m"), Some(-5.0));
}
