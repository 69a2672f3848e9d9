use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use envdb_core::{EnvDbError, Series, WeatherCacheConfig, WeatherProvider, WeatherRequest};
use moka::future::Cache;

/// Identity of a weather request for caching discrimination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RequestKey {
    location: (u64, u64, u64),
    start: NaiveDate,
    end: NaiveDate,
    timezone: &'static str,
}

impl From<&WeatherRequest> for RequestKey {
    fn from(req: &WeatherRequest) -> Self {
        Self {
            location: req.location.key(),
            start: req.start,
            end: req.end,
            timezone: req.timezone.name(),
        }
    }
}

/// Caches successful responses of the inner provider per request.
///
/// Failures are never cached, so a retried run reaches the archive again.
pub struct CachingWeather {
    inner: Arc<dyn WeatherProvider>,
    store: Cache<RequestKey, Arc<Series>>,
}

impl CachingWeather {
    /// Wrap `inner` with a response cache sized and aged by `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn WeatherProvider>, cfg: &WeatherCacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(cfg.capacity.max(1));
        if let Some(ttl) = cfg.ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner,
            store: builder.build(),
        }
    }
}

#[async_trait]
impl WeatherProvider for CachingWeather {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn hourly(&self, req: &WeatherRequest) -> Result<Series, EnvDbError> {
        let key = RequestKey::from(req);
        if let Some(hit) = self.store.get(&key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                provider = self.inner.name(),
                start = %req.start,
                end = %req.end,
                "weather cache hit"
            );
            return Ok(Series::clone(&hit));
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            provider = self.inner.name(),
            start = %req.start,
            end = %req.end,
            "weather cache miss"
        );
        let series = self.inner.hourly(req).await?;
        self.store.insert(key, Arc::new(series.clone())).await;
        Ok(series)
    }
}
