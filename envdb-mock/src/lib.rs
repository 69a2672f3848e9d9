//! envdb-mock
//!
//! Deterministic collaborators for tests and demos: a weather archive served
//! from an hourly fixture, and fixed solar and lunar ephemerides.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use envdb_core::{EnvDbError, Series, WeatherProvider, WeatherRequest};
use tokio::sync::Mutex;

mod fixtures;

pub use fixtures::ephemeris::{FixedMoon, FixedSun};
pub use fixtures::weather::hourly_fixture;

/// Instruction for how the mock weather archive answers.
#[derive(Debug, Clone)]
pub enum WeatherBehavior {
    /// Serve [`hourly_fixture`] for the requested range.
    Fixture,
    /// Return the provided series regardless of the request.
    Return(Series),
    /// Fail every call with the provided error.
    Fail(EnvDbError),
    /// Never answer (simulate a stalled request).
    Hang,
}

#[derive(Debug)]
struct InternalState {
    behavior: WeatherBehavior,
    failures_left: usize,
    requests: Vec<WeatherRequest>,
}

/// Mock weather archive. Clones share the same state and call counter.
#[derive(Debug, Clone)]
pub struct MockWeather {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWeather {
    /// Mock serving the hourly fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::with_behavior("envdb-mock", WeatherBehavior::Fixture)
    }

    /// Mock with a custom name and initial behavior.
    #[must_use]
    pub fn with_behavior(name: &'static str, behavior: WeatherBehavior) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(InternalState {
                behavior,
                failures_left: 0,
                requests: Vec::new(),
            })),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace the behavior for subsequent calls.
    pub async fn set_behavior(&self, behavior: WeatherBehavior) {
        self.state.lock().await.behavior = behavior;
    }

    /// Make the next `n` calls fail with a provider error before the
    /// configured behavior applies again.
    pub async fn fail_next(&self, n: usize) {
        self.state.lock().await.failures_left = n;
    }

    /// Number of `hourly` calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order.
    pub async fn requests(&self) -> Vec<WeatherRequest> {
        self.state.lock().await.requests.clone()
    }
}

#[async_trait]
impl WeatherProvider for MockWeather {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn hourly(&self, req: &WeatherRequest) -> Result<Series, EnvDbError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(*req);
            if guard.failures_left > 0 {
                guard.failures_left -= 1;
                return Err(EnvDbError::provider(self.name, "forced failure: hourly"));
            }
            guard.behavior.clone()
        };
        match behavior {
            WeatherBehavior::Fixture => Ok(hourly_fixture(req)),
            WeatherBehavior::Return(series) => Ok(series),
            WeatherBehavior::Fail(err) => Err(err),
            WeatherBehavior::Hang => std::future::pending().await,
        }
    }
}
