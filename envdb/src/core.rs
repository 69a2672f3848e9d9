use std::sync::Arc;

use envdb_core::types::{
    AggregationPlan, EnvDbConfig, Frequency, Location, Reducer, ResamplePolicy, RetryConfig,
    WeatherCacheConfig,
};
use envdb_core::{
    DateNormalizer, EnvDbError, LunarEphemeris, MoonEngine, NamedSeries, SolarEphemeris,
    SourceReport, Spa, SunEngine, Tz, WeatherProvider, infer_native_frequency, resample_from,
};
use envdb_middleware::WeatherBuilder;

use crate::aligner::MultiSourceAligner;
use crate::ingest::{RawSource, ingest};
use crate::records::MultiResolutionDataset;

/// Orchestrator turning raw sources into a [`MultiResolutionDataset`].
pub struct EnvDb {
    pub(crate) cfg: EnvDbConfig,
    pub(crate) weather: Option<Arc<dyn WeatherProvider>>,
    pub(crate) solar: Arc<dyn SolarEphemeris>,
    pub(crate) lunar: Arc<dyn LunarEphemeris>,
}

/// Builder for constructing an `EnvDb` orchestrator with custom configuration.
pub struct EnvDbBuilder {
    cfg: EnvDbConfig,
    weather: Option<Arc<dyn WeatherProvider>>,
    solar: Option<Arc<dyn SolarEphemeris>>,
    lunar: Option<Arc<dyn LunarEphemeris>>,
}

impl Default for EnvDbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvDbBuilder {
    /// Create a new builder with the default configuration.
    ///
    /// Behavior and trade-offs:
    /// - Starts without a weather archive; datasets then carry source columns only.
    /// - Uses the built-in SPA ephemeris for the Sun and the Moon unless
    ///   replaced via [`solar_ephemeris`](Self::solar_ephemeris) and
    ///   [`lunar_ephemeris`](Self::lunar_ephemeris).
    #[must_use]
    pub fn new() -> Self {
        Self {
            cfg: EnvDbConfig::default(),
            weather: None,
            solar: None,
            lunar: None,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: EnvDbConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Observation site.
    ///
    /// The Sun and Moon day caches are bound to it; every run builds fresh caches.
    #[must_use]
    pub const fn location(mut self, latitude: f64, longitude: f64, elevation: f64) -> Self {
        self.cfg.location = Location::new(latitude, longitude, elevation);
        self
    }

    /// Canonical timezone every date is relabeled into.
    #[must_use]
    pub const fn timezone(mut self, tz: Tz) -> Self {
        self.cfg.timezone = tz;
        self
    }

    /// Cadence of the raw table.
    #[must_use]
    pub const fn output_frequency(mut self, f: Frequency) -> Self {
        self.cfg.output_frequency = f;
        self
    }

    /// Default `strftime` format for text dates.
    #[must_use]
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.cfg.date_format = format.into();
        self
    }

    /// Reducer for rows sharing a timestamp within one source.
    #[must_use]
    pub const fn dedup_reducer(mut self, keep: Reducer) -> Self {
        self.cfg.dedup_reducer = keep;
        self
    }

    /// Default resampling policy for sources without their own.
    #[must_use]
    pub fn resample_policy(mut self, policy: ResamplePolicy) -> Self {
        self.cfg.resample = policy;
        self
    }

    /// Reducers of the hourly and daily rollups.
    #[must_use]
    pub fn rollup(mut self, plan: AggregationPlan) -> Self {
        self.cfg.rollup = plan;
        self
    }

    /// Half width of the rising and setting bands, in seconds.
    #[must_use]
    pub const fn twilight_half_width(mut self, seconds: f64) -> Self {
        self.cfg.twilight_half_width_secs = seconds;
        self
    }

    /// Decimal places of every numeric output.
    #[must_use]
    pub const fn precision(mut self, places: u32) -> Self {
        self.cfg.precision = places;
        self
    }

    /// Retry policy applied to the weather archive.
    #[must_use]
    pub const fn weather_retry(mut self, cfg: RetryConfig) -> Self {
        self.cfg.weather_retry = cfg;
        self
    }

    /// Response cache applied to the weather archive.
    #[must_use]
    pub const fn weather_cache(mut self, cfg: WeatherCacheConfig) -> Self {
        self.cfg.weather_cache = cfg;
        self
    }

    /// Weather archive; wrapped with the configured cache and retry layers at build.
    #[must_use]
    pub fn weather(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    /// Solar ephemeris replacing the built-in SPA ephemeris.
    #[must_use]
    pub fn solar_ephemeris(mut self, e: Arc<dyn SolarEphemeris>) -> Self {
        self.solar = Some(e);
        self
    }

    /// Lunar ephemeris replacing the built-in mean synodic month.
    #[must_use]
    pub fn lunar_ephemeris(mut self, e: Arc<dyn LunarEphemeris>) -> Self {
        self.lunar = Some(e);
        self
    }

    /// Build the `EnvDb` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the latitude is outside `[-90, 90]`, the
    /// longitude outside `[-180, 180]`, the twilight half width negative or
    /// not finite, or the precision above 12 places.
    pub fn build(self) -> Result<EnvDb, EnvDbError> {
        let Location {
            latitude,
            longitude,
            elevation,
        } = self.cfg.location;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(EnvDbError::InvalidArg(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(EnvDbError::InvalidArg(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        if !elevation.is_finite() {
            return Err(EnvDbError::InvalidArg(format!(
                "elevation {elevation} is not finite"
            )));
        }
        let hw = self.cfg.twilight_half_width_secs;
        if !hw.is_finite() || hw < 0.0 {
            return Err(EnvDbError::InvalidArg(format!(
                "twilight half width {hw} must be a non-negative number of seconds"
            )));
        }
        if self.cfg.precision > 12 {
            return Err(EnvDbError::InvalidArg(format!(
                "precision {} above 12 decimal places",
                self.cfg.precision
            )));
        }

        let weather = self.weather.map(|raw| {
            WeatherBuilder::new(raw)
                .with_retry(&self.cfg.weather_retry)
                .with_cache(&self.cfg.weather_cache)
                .build()
        });
        Ok(EnvDb {
            weather,
            solar: self
                .solar
                .unwrap_or_else(|| Arc::new(Spa) as Arc<dyn SolarEphemeris>),
            lunar: self
                .lunar
                .unwrap_or_else(|| Arc::new(Spa) as Arc<dyn LunarEphemeris>),
            cfg: self.cfg,
        })
    }
}

impl EnvDb {
    /// Start building a new `EnvDb` instance.
    ///
    /// ```rust,ignore
    /// use envdb::{EnvDb, Frequency, RawSource};
    ///
    /// let db = EnvDb::builder()
    ///     .location(48.886, 2.333, 35.0)
    ///     .timezone(chrono_tz::Europe::Paris)
    ///     .output_frequency(Frequency::HOUR)
    ///     .build()?;
    /// let probe = RawSource::new("probe", ["2024-05-01 10:00:00", "2024-05-01 11:00:00"])
    ///     .with_dense_column("temp", [12.5, 13.0]);
    /// let dataset = db.build_dataset(vec![probe]).await?;
    /// ```
    #[must_use]
    pub fn builder() -> EnvDbBuilder {
        EnvDbBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EnvDbConfig {
        &self.cfg
    }

    /// Date normalizer for the configured zone and format.
    #[must_use]
    pub fn normalizer(&self) -> DateNormalizer {
        DateNormalizer::from_config(&self.cfg)
    }

    /// Standalone solar-cycle classifier for the configured site.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the configured half width is invalid.
    pub fn sun_engine(&self) -> Result<SunEngine<Arc<dyn SolarEphemeris>>, EnvDbError> {
        SunEngine::new(
            Arc::clone(&self.solar),
            self.cfg.location,
            self.cfg.timezone,
            self.cfg.twilight_half_width_secs,
        )
    }

    /// Standalone lunar phase engine.
    #[must_use]
    pub fn moon_engine(&self) -> MoonEngine<Arc<dyn LunarEphemeris>> {
        MoonEngine::new(Arc::clone(&self.lunar), self.cfg.timezone)
    }

    /// Aligner configured like this orchestrator.
    #[must_use]
    pub fn aligner(&self) -> MultiSourceAligner {
        let aligner = MultiSourceAligner::new(
            self.cfg.location,
            self.cfg.timezone,
            Arc::clone(&self.solar),
            Arc::clone(&self.lunar),
        )
        .half_width(self.cfg.twilight_half_width_secs)
        .rollup(self.cfg.rollup.clone())
        .precision(self.cfg.precision);
        match &self.weather {
            Some(w) => aligner.weather(Arc::clone(w)),
            None => aligner,
        }
    }

    /// Ingest, resample and align `sources` into one dataset.
    ///
    /// Behavior:
    /// - Each source is normalized into the configured zone, sorted and
    ///   deduplicated with the configured reducer.
    /// - A source whose dates fail to parse is skipped; the failure is kept in
    ///   its [`SourceReport`] and the run continues with the others.
    /// - Each surviving source is resampled to the output cadence with its own
    ///   policy, or the configured one.
    /// - The resampled sources are aligned in input order (earlier sources win
    ///   on shared column names).
    ///
    /// # Errors
    /// - `EmptySeries` when no source survives ingestion.
    /// - `AmbiguousFrequency`, `NoOverlap`, `UndefinedAstralEvent` or
    ///   `Provider` abort the run.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "envdb::build_dataset",
            skip(self, sources),
            fields(sources = sources.len(), output = %self.cfg.output_frequency),
            err,
        )
    )]
    pub async fn build_dataset(
        &self,
        sources: Vec<RawSource>,
    ) -> Result<MultiResolutionDataset, EnvDbError> {
        let normalizer = self.normalizer();
        let output = self.cfg.output_frequency;
        let mut reports = Vec::with_capacity(sources.len());
        let mut named = Vec::with_capacity(sources.len());

        for source in &sources {
            let mut report = SourceReport::new(source.name.clone(), source.len());
            let series = match ingest(&normalizer, source, self.cfg.dedup_reducer) {
                Ok(s) => s,
                Err(e) if e.is_source_local() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(source = %source.name, error = %e, "source skipped");
                    report.warnings.push(e);
                    reports.push(report);
                    continue;
                }
                Err(e) => return Err(e),
            };
            report.rows_deduped = series.len();
            if series.is_empty() {
                return Err(EnvDbError::empty_series(source.name.clone()));
            }

            let policy = source.policy.as_ref().unwrap_or(&self.cfg.resample);
            let native = match policy.native_hint {
                Some(f) => f,
                None => infer_native_frequency(&series)?,
            };
            let resampled = resample_from(&series, native, output, policy)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                source = %source.name,
                %native,
                rows_in = series.len(),
                rows_out = resampled.len(),
                "source resampled"
            );
            report.native_frequency = Some(native);
            report.rows_out = resampled.len();
            report.included = true;
            reports.push(report);
            named.push(NamedSeries::new(source.name.clone(), resampled));
        }

        if named.is_empty() {
            return Err(EnvDbError::empty_series("no source survived ingestion"));
        }

        let mut dataset = self.aligner().build(named, output).await?;
        dataset.info.sources = reports;
        Ok(dataset)
    }
}
