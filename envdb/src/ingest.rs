use envdb_core::{
    DateNormalizer, EnvDbError, RawDate, Reducer, ResamplePolicy, Series, dedup_by_timestamp,
};

/// A named table of raw observations as handed over by a reader.
///
/// Dates may be text (parsed with `format`, or the configured default) or
/// already-typed timestamps. Every value column must have one entry per date.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSource {
    /// Source name, used in reports and attribution.
    pub name: String,
    /// One raw date per row.
    pub dates: Vec<RawDate>,
    /// Value columns in display order.
    pub columns: Vec<(String, Vec<Option<f64>>)>,
    /// Format for text dates; `None` uses the configured default.
    pub format: Option<String>,
    /// Resampling policy for this source; `None` uses the configured policy.
    pub policy: Option<ResamplePolicy>,
}

impl RawSource {
    /// Source with the given dates and no value columns yet.
    pub fn new<I, D>(name: impl Into<String>, dates: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<RawDate>,
    {
        Self {
            name: name.into(),
            dates: dates.into_iter().map(Into::into).collect(),
            columns: vec![],
            format: None,
            policy: None,
        }
    }

    /// Add a value column; `None` marks a missing observation.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    /// Add a fully populated value column.
    #[must_use]
    pub fn with_dense_column(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        self.with_column(name, values.into_iter().map(Some).collect())
    }

    /// Parse text dates with `format`.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Resample this source with `policy` instead of the configured one.
    #[must_use]
    pub fn with_policy(mut self, policy: ResamplePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Number of raw rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the source has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Normalize, sort and deduplicate a raw source into a [`Series`].
///
/// # Errors
/// - `InvalidDateFormat` for the first date that fails to parse.
/// - `Data` when a column length differs from the date count.
pub fn ingest(
    normalizer: &DateNormalizer,
    source: &RawSource,
    keep: Reducer,
) -> Result<Series, EnvDbError> {
    let n = source.dates.len();
    if let Some((name, values)) = source.columns.iter().find(|(_, v)| v.len() != n) {
        return Err(EnvDbError::Data(format!(
            "{}: column {name:?} has {} values for {n} dates",
            source.name,
            values.len()
        )));
    }

    let format = source.format.as_deref();
    let rows = source
        .dates
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let ts = normalizer.normalize(raw.clone(), format)?;
            let values = source.columns.iter().map(|(_, v)| v[i]).collect();
            Ok((ts, values))
        })
        .collect::<Result<Vec<_>, EnvDbError>>()?;

    let names = source.columns.iter().map(|(c, _)| c.clone()).collect();
    dedup_by_timestamp(names, rows, keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Paris;

    fn normalizer() -> DateNormalizer {
        DateNormalizer::new(Paris, "%Y-%m-%d %H:%M:%S")
    }

    #[test]
    fn sorts_and_keeps_max_of_duplicates() {
        let src = RawSource::new(
            "hydrophone",
            ["2024-05-01 00:02:00", "2024-05-01 00:01:00", "2024-05-01 00:02:00"],
        )
        .with_dense_column("clicks", [3.0, 1.0, 7.0]);
        let s = ingest(&normalizer(), &src, Reducer::Max).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.column("clicks").unwrap().values, [Some(1.0), Some(7.0)]);
        assert_eq!(s.timezone(), Some(Paris));
    }

    #[test]
    fn custom_format_and_bad_dates() {
        let src = RawSource::new("probe", ["01/05/2024 10:00"])
            .with_dense_column("temp", [12.5])
            .with_format("%d/%m/%Y %H:%M");
        assert_eq!(ingest(&normalizer(), &src, Reducer::Max).unwrap().len(), 1);

        let bad = RawSource::new("probe", ["2024-05-01T10:00"]).with_dense_column("temp", [1.0]);
        let err = ingest(&normalizer(), &bad, Reducer::Max).unwrap_err();
        assert!(err.is_source_local());
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let src =
            RawSource::new("probe", ["2024-05-01 10:00:00"]).with_dense_column("temp", [1.0, 2.0]);
        let err = ingest(&normalizer(), &src, Reducer::Max).unwrap_err();
        assert!(matches!(err, EnvDbError::Data(_)));
    }
}
