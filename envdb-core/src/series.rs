use serde::Serialize;

use crate::types::{EnvDbError, Instant, Span, Tz};

/// One named numeric column. `None` marks a missing observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// One slot per timestamp of the owning series.
    pub values: Vec<Option<f64>>,
}

impl Column {
    /// Build a column.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Build a column where every value is present.
    pub fn dense(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, values.into_iter().map(Some).collect())
    }
}

/// A table of strictly increasing timestamps and aligned numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    timestamps: Vec<Instant>,
    columns: Vec<Column>,
}

impl Series {
    /// Build a series, checking column lengths and timestamp order.
    ///
    /// `NaN` values are stored as missing.
    ///
    /// # Errors
    /// Returns `Data` when a column length differs from the timestamp count
    /// or when timestamps are not strictly increasing.
    pub fn new(timestamps: Vec<Instant>, mut columns: Vec<Column>) -> Result<Self, EnvDbError> {
        for c in &mut columns {
            if c.values.len() != timestamps.len() {
                return Err(EnvDbError::Data(format!(
                    "column {:?} has {} values for {} timestamps",
                    c.name,
                    c.values.len(),
                    timestamps.len()
                )));
            }
            for v in &mut c.values {
                if v.is_some_and(f64::is_nan) {
                    *v = None;
                }
            }
        }
        if let Some(w) = timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(EnvDbError::Data(format!(
                "timestamps not strictly increasing at {}",
                w[1]
            )));
        }
        Ok(Self {
            timestamps,
            columns,
        })
    }

    /// A series with the given column names and no rows.
    pub fn empty<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            timestamps: vec![],
            columns: names.into_iter().map(|n| Column::new(n, vec![])).collect(),
        }
    }

    /// Assemble without validation; callers guarantee the invariants.
    pub(crate) const fn from_parts(timestamps: Vec<Instant>, columns: Vec<Column>) -> Self {
        Self {
            timestamps,
            columns,
        }
    }

    /// Timestamps in increasing order.
    #[must_use]
    pub fn timestamps(&self) -> &[Instant] {
        &self.timestamps
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look a column up by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Value at (`row`, `col`); missing when out of range.
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.columns.get(col)?.values.get(row).copied().flatten()
    }

    /// Values of one row in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.columns
            .iter()
            .map(move |c| c.values.get(row).copied().flatten())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Inclusive range of epoch seconds covered, `None` when empty.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        let first = self.timestamps.first()?;
        let last = self.timestamps.last()?;
        Some(Span::new(first.timestamp(), last.timestamp()))
    }

    /// Zone of the first timestamp.
    #[must_use]
    pub fn timezone(&self) -> Option<Tz> {
        self.timestamps.first().map(chrono::DateTime::timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32) -> Instant {
        chrono_tz::UTC.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn rejects_unsorted_and_ragged() {
        let err = Series::new(vec![t(1), t(0)], vec![]).unwrap_err();
        assert!(matches!(err, EnvDbError::Data(_)));
        let err = Series::new(vec![t(0)], vec![Column::dense("a", [1.0, 2.0])]).unwrap_err();
        assert!(matches!(err, EnvDbError::Data(_)));
    }

    #[test]
    fn nan_becomes_missing() {
        let s = Series::new(vec![t(0), t(1)], vec![Column::dense("a", [f64::NAN, 1.0])]).unwrap();
        assert_eq!(s.value(0, 0), None);
        assert_eq!(s.value(1, 0), Some(1.0));
        assert_eq!(s.span(), Some(Span::new(t(0).timestamp(), t(1).timestamp())));
    }
}
