use chrono::NaiveDate;
use envdb_core::{
    Attribution, Frequency, Instant, Location, PhaseLabel, SolarCycle, SolarCyclePhase,
    SourceReport, SunDay, Tz,
};
use serde::Serialize;

/// Named-column table of output records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<R> {
    /// Value column names; `values[i]` of every row belongs to `columns[i]`.
    pub columns: Vec<String>,
    /// Records in output order.
    pub rows: Vec<R>,
}

impl<R> Table<R> {
    pub(crate) const fn new(columns: Vec<String>, rows: Vec<R>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a value column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Records carrying one value per table column.
pub trait HasValues {
    /// Values aligned with [`Table::columns`].
    fn values(&self) -> &[Option<f64>];
}

impl<R: HasValues> Table<R> {
    /// Value of `column` in row `row`.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let j = self.column_index(column)?;
        self.rows.get(row)?.values().get(j).copied().flatten()
    }
}

/// One merged timestamp at the output cadence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    /// Timestamp in the configured zone.
    pub date: Instant,
    /// Solar-cycle classification of `date`.
    pub suncycle: SolarCycle,
    /// Source and weather values.
    pub values: Vec<Option<f64>>,
}

/// One hour of one solar-cycle segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRecord {
    /// Hour bucket start (the raw timestamp when passed through).
    pub hour: Instant,
    /// Solar-cycle day shared by the members.
    pub suncycle_day: NaiveDate,
    /// Solar-cycle phase shared by the members.
    pub suncycle_phase: SolarCyclePhase,
    /// Earliest member timestamp.
    pub date_min: Instant,
    /// Latest member timestamp.
    pub date_max: Instant,
    /// Number of raw rows reduced into this record.
    pub samples: usize,
    /// Reduced values.
    pub values: Vec<Option<f64>>,
}

/// One solar-cycle day, per phase or across all phases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    /// Solar-cycle day.
    pub day: NaiveDate,
    /// Phase, or [`PhaseLabel::All`] for the whole day.
    pub phase: PhaseLabel,
    /// Number of hourly records covered.
    pub hours: usize,
    /// Number of raw rows reduced into this record.
    pub samples: usize,
    /// Reduced values.
    pub values: Vec<Option<f64>>,
    /// Solar events of the day.
    pub sun: SunDay,
    /// Lunar phase of the day in `[0, 28)`.
    pub moon_phase: f64,
}

/// Solar events and lunar phase of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyAstralRecord {
    /// Calendar day.
    pub day: NaiveDate,
    /// Solar events.
    pub sun: SunDay,
    /// Lunar phase in `[0, 28)`.
    pub moon_phase: f64,
}

impl HasValues for RawRecord {
    fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

impl HasValues for HourlyRecord {
    fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

impl HasValues for DailyRecord {
    fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// Provenance of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    /// Observation site.
    pub location: Location,
    /// Zone every instant is labeled with.
    pub timezone: Tz,
    /// Cadence of the raw table.
    pub output_frequency: Frequency,
    /// Per-source ingestion outcome, in input order.
    pub sources: Vec<SourceReport>,
    /// Time span contributed by each merged source.
    pub spans: Attribution,
}

/// Raw, hourly and daily tables plus per-day astronomical context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiResolutionDataset {
    /// Merged sources at the output cadence.
    pub raw: Table<RawRecord>,
    /// Hourly rollup grouped by solar-cycle segment.
    pub hourly: Table<HourlyRecord>,
    /// Daily rollup, one row per phase plus an `all` row per day.
    pub daily: Table<DailyRecord>,
    /// Sun and Moon records for every day the dataset touches.
    pub astral_daily: Vec<DailyAstralRecord>,
    /// Provenance.
    pub info: DatasetInfo,
}
