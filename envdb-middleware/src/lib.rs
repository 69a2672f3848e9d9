//! envdb-middleware
//!
//! Wrappers around a [`WeatherProvider`](envdb_core::WeatherProvider) that add
//! a response cache and retries with jittered exponential backoff, plus a
//! builder composing them.

mod backoff;
mod builder;
mod cache;
mod retry;

pub use crate::backoff::jitter_wait;
pub use crate::builder::WeatherBuilder;
pub use crate::cache::CachingWeather;
pub use crate::retry::RetryingWeather;
