//! Builder for composing a weather provider with middleware layers.
//!
//! Layers form an onion around the raw provider:
//!
//! ```text
//! Caller
//!     ↓
//! CachingWeather   (answers repeated requests without a network call)
//!     ↓
//! RetryingWeather  (retries transient failures with backoff)
//!     ↓
//! Raw provider     (e.g. an HTTP archive client)
//! ```
//!
//! The cache sits outside the retry layer so that a hit never waits on a
//! backoff and a miss that exhausts its retries leaves nothing cached.

use std::sync::Arc;

use envdb_core::{RetryConfig, WeatherCacheConfig, WeatherProvider};

use crate::cache::CachingWeather;
use crate::retry::RetryingWeather;

/// Composes a raw weather provider with optional retry and cache layers.
pub struct WeatherBuilder {
    raw: Arc<dyn WeatherProvider>,
    retry: Option<RetryConfig>,
    cache: Option<WeatherCacheConfig>,
}

impl WeatherBuilder {
    /// Create a new builder from a raw, unwrapped provider.
    #[must_use]
    pub fn new(raw: Arc<dyn WeatherProvider>) -> Self {
        Self {
            raw,
            retry: None,
            cache: None,
        }
    }

    /// Add or replace the retry layer.
    #[must_use]
    pub fn with_retry(mut self, cfg: &RetryConfig) -> Self {
        self.retry = Some(*cfg);
        self
    }

    /// Remove the retry layer if present.
    #[must_use]
    pub fn without_retry(mut self) -> Self {
        self.retry = None;
        self
    }

    /// Add or replace the response cache.
    #[must_use]
    pub fn with_cache(mut self, cfg: &WeatherCacheConfig) -> Self {
        self.cache = Some(*cfg);
        self
    }

    /// Remove the response cache if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Names of the configured layers, outermost first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.cache.is_some() {
            names.push("CachingWeather");
        }
        if self.retry.is_some() {
            names.push("RetryingWeather");
        }
        names
    }

    /// Build the wrapped provider.
    #[must_use]
    pub fn build(self) -> Arc<dyn WeatherProvider> {
        let mut provider = self.raw;
        if let Some(cfg) = self.retry {
            provider = Arc::new(RetryingWeather::new(provider, cfg));
        }
        if let Some(cfg) = &self.cache {
            provider = Arc::new(CachingWeather::new(provider, cfg));
        }
        provider
    }
}
