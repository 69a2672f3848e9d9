use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use envdb_core::{EnvDbError, RetryConfig, Series, WeatherProvider, WeatherRequest};

use crate::backoff::{base_delay_ms, jitter_wait};

/// Retries transient failures of the inner provider with jittered
/// exponential backoff.
///
/// Only errors for which [`EnvDbError::is_retryable`] holds are retried; the
/// last error is returned once `max_attempts` calls have failed.
pub struct RetryingWeather {
    inner: Arc<dyn WeatherProvider>,
    cfg: RetryConfig,
}

impl RetryingWeather {
    /// Wrap `inner` with the retry policy `cfg`.
    pub fn new(inner: Arc<dyn WeatherProvider>, cfg: RetryConfig) -> Self {
        Self { inner, cfg }
    }

    /// Active retry policy.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.cfg
    }
}

#[async_trait]
impl WeatherProvider for RetryingWeather {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "envdb::middleware::retry::hourly",
            skip(self, req),
            fields(provider = self.inner.name(), start = %req.start, end = %req.end),
        )
    )]
    async fn hourly(&self, req: &WeatherRequest) -> Result<Series, EnvDbError> {
        let attempts = self.cfg.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.hourly(req).await {
                Ok(series) => return Ok(series),
                Err(err) if attempt < attempts && err.is_retryable() => {
                    let wait = jitter_wait(
                        base_delay_ms(&self.cfg.backoff, attempt),
                        self.cfg.backoff.jitter_percent,
                    );
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        attempt,
                        wait_ms = wait,
                        error = %err,
                        "weather call failed; retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
