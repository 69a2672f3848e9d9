use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use envdb_core::{
    AggregationPlan, EnvDbError, Frequency, Instant, Location, LunarEphemeris, MoonEngine,
    NamedSeries, PhaseLabel, ResolvedPlan, SolarCycle, SolarCyclePhase, SolarEphemeris,
    SourceReport, SunEngine, Tz, WeatherProvider, WeatherRequest, bucket_floor, merge_outer,
    round_opt, round_to,
};

use crate::records::{
    DailyAstralRecord, DailyRecord, DatasetInfo, HourlyRecord, MultiResolutionDataset, RawRecord,
    Table,
};

/// Merges resampled sources and derives the solar-cycle rollups.
///
/// Every [`build`](Self::build) starts from fresh Sun and Moon day caches, so
/// one aligner can serve several runs without leaking astral state between
/// them.
pub struct MultiSourceAligner {
    location: Location,
    timezone: Tz,
    half_width_s: f64,
    rollup: AggregationPlan,
    precision: u32,
    solar: Arc<dyn SolarEphemeris>,
    lunar: Arc<dyn LunarEphemeris>,
    weather: Option<Arc<dyn WeatherProvider>>,
}

impl MultiSourceAligner {
    /// Aligner for one site and zone.
    pub fn new(
        location: Location,
        timezone: Tz,
        solar: Arc<dyn SolarEphemeris>,
        lunar: Arc<dyn LunarEphemeris>,
    ) -> Self {
        Self {
            location,
            timezone,
            half_width_s: 5_400.0,
            rollup: AggregationPlan::default(),
            precision: 3,
            solar,
            lunar,
            weather: None,
        }
    }

    /// Half width of the rising and setting bands, in seconds.
    #[must_use]
    pub const fn half_width(mut self, seconds: f64) -> Self {
        self.half_width_s = seconds;
        self
    }

    /// Reducers used by the hourly and daily rollups.
    #[must_use]
    pub fn rollup(mut self, plan: AggregationPlan) -> Self {
        self.rollup = plan;
        self
    }

    /// Decimal places of every numeric output.
    #[must_use]
    pub const fn precision(mut self, places: u32) -> Self {
        self.precision = places;
        self
    }

    /// Attach hourly weather from `provider` to every raw row.
    #[must_use]
    pub fn weather(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    /// Merge `sources` and derive the hourly and daily rollups.
    ///
    /// Behavior:
    /// - Sources are outer-merged on timestamp in priority order; a timestamp
    ///   not covered by a source leaves its columns missing.
    /// - Every raw row is classified into a solar-cycle phase and day.
    /// - When a weather provider is set it is called once for the covering
    ///   day range, and each row receives the values of its hour.
    /// - Hourly rows pass through unchanged when `output_frequency` is one
    ///   hour or coarser, and are otherwise grouped by
    ///   `(hour, solar-cycle day, phase)`.
    /// - Daily rows are grouped by `(solar-cycle day, phase)`, plus one `all`
    ///   row per day computed from the same raw values.
    /// - Rounding to `precision` happens last.
    ///
    /// # Errors
    /// - `EmptySeries` / `NoOverlap` from the merge.
    /// - `UndefinedAstralEvent` when a day has no sunrise or sunset.
    /// - `Provider` when the weather call fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "envdb::aligner::build",
            skip(self, sources),
            fields(sources = sources.len(), output = %output_frequency),
            err,
        )
    )]
    pub async fn build(
        &self,
        sources: Vec<NamedSeries>,
        output_frequency: Frequency,
    ) -> Result<MultiResolutionDataset, EnvDbError> {
        let merged = merge_outer(&sources)?;
        let mut columns: Vec<String> = merged
            .series
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let dates: Vec<Instant> = merged
            .series
            .timestamps()
            .iter()
            .map(|t| t.with_timezone(&self.timezone))
            .collect();
        let mut values: Vec<Vec<Option<f64>>> = (0..dates.len())
            .map(|i| merged.series.row(i).collect())
            .collect();

        let mut sun = SunEngine::new(
            Arc::clone(&self.solar),
            self.location,
            self.timezone,
            self.half_width_s,
        )?;
        let mut moon = MoonEngine::new(Arc::clone(&self.lunar), self.timezone);
        let cycles = dates
            .iter()
            .map(|t| sun.classify(t))
            .collect::<Result<Vec<SolarCycle>, EnvDbError>>()?;

        if let Some(provider) = &self.weather {
            self.attach_weather(provider.as_ref(), &dates, &mut columns, &mut values)
                .await?;
        }

        let plan = self.rollup.resolve(&columns);
        let hourly_groups = group_hours(&dates, &cycles, output_frequency);
        let hourly_rows: Vec<HourlyRecord> = hourly_groups
            .iter()
            .map(|g| HourlyRecord {
                hour: g.hour,
                suncycle_day: g.day,
                suncycle_phase: g.phase,
                date_min: dates[g.members[0]],
                date_max: dates[g.members[g.members.len() - 1]],
                samples: g.members.len(),
                values: reduce_rows(&plan, &values, &g.members),
            })
            .collect();

        let mut hour_of_row = vec![0usize; dates.len()];
        for (h, g) in hourly_groups.iter().enumerate() {
            for &i in &g.members {
                hour_of_row[i] = h;
            }
        }

        let mut daily_groups: BTreeMap<(NaiveDate, PhaseLabel), Vec<usize>> = BTreeMap::new();
        for (i, c) in cycles.iter().enumerate() {
            daily_groups
                .entry((c.day, PhaseLabel::Phase(c.phase)))
                .or_default()
                .push(i);
            daily_groups
                .entry((c.day, PhaseLabel::All))
                .or_default()
                .push(i);
        }
        let mut daily_rows = Vec::with_capacity(daily_groups.len());
        for ((day, phase), members) in &daily_groups {
            let hours: BTreeSet<usize> = members.iter().map(|&i| hour_of_row[i]).collect();
            daily_rows.push(DailyRecord {
                day: *day,
                phase: *phase,
                hours: hours.len(),
                samples: members.len(),
                values: reduce_rows(&plan, &values, members),
                sun: sun.day_info_for(*day)?,
                moon_phase: moon.day_info_for(*day)?.phase,
            });
        }

        let astral_daily = match (cycles.iter().map(|c| c.day).min(), dates.last()) {
            (Some(first), Some(last)) => {
                let last = last.date_naive().max(first);
                let suns = sun.daily_in_range(first, last)?;
                let moons = moon.daily_in_range(first, last)?;
                suns.into_iter()
                    .zip(moons)
                    .map(|(s, m)| DailyAstralRecord {
                        day: s.day,
                        sun: s,
                        moon_phase: m.phase,
                    })
                    .collect()
            }
            _ => Vec::new(),
        };

        #[cfg(feature = "tracing")]
        tracing::info!(
            raw = dates.len(),
            hourly = hourly_rows.len(),
            daily = daily_rows.len(),
            astral_days = sun.cache().len(),
            "dataset aligned"
        );

        let raw_rows = dates
            .into_iter()
            .zip(cycles)
            .zip(values)
            .map(|((date, suncycle), values)| RawRecord {
                date,
                suncycle,
                values,
            })
            .collect();

        let sources = sources
            .iter()
            .map(|s| SourceReport {
                rows_deduped: s.series.len(),
                rows_out: s.series.len(),
                included: true,
                ..SourceReport::new(s.name.clone(), s.series.len())
            })
            .collect();

        let mut dataset = MultiResolutionDataset {
            raw: Table::new(columns.clone(), raw_rows),
            hourly: Table::new(columns.clone(), hourly_rows),
            daily: Table::new(columns, daily_rows),
            astral_daily,
            info: DatasetInfo {
                location: self.location,
                timezone: self.timezone,
                output_frequency,
                sources,
                spans: merged.attribution,
            },
        };
        round_dataset(&mut dataset, self.precision);
        Ok(dataset)
    }

    async fn attach_weather(
        &self,
        provider: &dyn WeatherProvider,
        dates: &[Instant],
        columns: &mut Vec<String>,
        values: &mut [Vec<Option<f64>>],
    ) -> Result<(), EnvDbError> {
        let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
            return Ok(());
        };
        let req = WeatherRequest {
            location: self.location,
            start: first.date_naive(),
            end: last.date_naive(),
            timezone: self.timezone,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            provider = provider.name(),
            start = %req.start,
            end = %req.end,
            "fetching weather"
        );
        let weather = provider.hourly(&req).await.map_err(|e| match e {
            EnvDbError::Provider { .. } => e,
            other => EnvDbError::provider(provider.name(), other.to_string()),
        })?;

        let by_hour: HashMap<i64, usize> = weather
            .timestamps()
            .iter()
            .enumerate()
            .map(|(i, t)| (bucket_floor(t, Frequency::HOUR).timestamp(), i))
            .collect();
        let kept: Vec<usize> = weather
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| !columns.contains(&c.name))
            .map(|(j, _)| j)
            .collect();
        #[cfg(feature = "tracing")]
        if kept.len() < weather.columns().len() {
            tracing::warn!(
                provider = provider.name(),
                "weather columns shadowed by source columns were skipped"
            );
        }
        columns.extend(kept.iter().map(|&j| weather.columns()[j].name.clone()));
        for (t, row) in dates.iter().zip(values.iter_mut()) {
            let hit = by_hour.get(&bucket_floor(t, Frequency::HOUR).timestamp());
            row.extend(kept.iter().map(|&j| hit.and_then(|&i| weather.value(i, j))));
        }
        Ok(())
    }
}

struct HourGroup {
    hour: Instant,
    day: NaiveDate,
    phase: SolarCyclePhase,
    members: Vec<usize>,
}

fn group_hours(dates: &[Instant], cycles: &[SolarCycle], output: Frequency) -> Vec<HourGroup> {
    if output >= Frequency::HOUR {
        return dates
            .iter()
            .zip(cycles)
            .enumerate()
            .map(|(i, (t, c))| HourGroup {
                hour: *t,
                day: c.day,
                phase: c.phase,
                members: vec![i],
            })
            .collect();
    }
    let mut groups: BTreeMap<(Instant, NaiveDate, SolarCyclePhase), Vec<usize>> = BTreeMap::new();
    for (i, (t, c)) in dates.iter().zip(cycles).enumerate() {
        groups
            .entry((bucket_floor(t, Frequency::HOUR), c.day, c.phase))
            .or_default()
            .push(i);
    }
    groups
        .into_iter()
        .map(|((hour, day, phase), members)| HourGroup {
            hour,
            day,
            phase,
            members,
        })
        .collect()
}

fn reduce_rows(
    plan: &ResolvedPlan,
    values: &[Vec<Option<f64>>],
    members: &[usize],
) -> Vec<Option<f64>> {
    (0..plan.len())
        .map(|j| plan.reducer(j).reduce(members.iter().map(|&i| values[i][j])))
        .collect()
}

fn round_dataset(ds: &mut MultiResolutionDataset, places: u32) {
    let round_all = |values: &mut Vec<Option<f64>>| {
        for v in values.iter_mut() {
            *v = round_opt(*v, places);
        }
    };
    for r in &mut ds.raw.rows {
        round_all(&mut r.values);
        r.suncycle.dist_rising_s = round_to(r.suncycle.dist_rising_s, places);
        r.suncycle.dist_setting_s = round_to(r.suncycle.dist_setting_s, places);
    }
    for r in &mut ds.hourly.rows {
        round_all(&mut r.values);
    }
    for r in &mut ds.daily.rows {
        round_all(&mut r.values);
        r.moon_phase = round_to(r.moon_phase, places);
    }
    for a in &mut ds.astral_daily {
        a.moon_phase = round_to(a.moon_phase, places);
    }
}
