//! Reducers and the per-column aggregation plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Statistic used to collapse a group of observations into one value.
///
/// Missing observations are skipped. A group without any present value
/// reduces to missing, except for [`Reducer::Count`] which yields `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Reducer {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Sum of present values.
    Sum,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// First present value in time order.
    First,
    /// Last present value in time order.
    Last,
    /// Median (mean of the two middle values for even groups).
    Median,
    /// Number of present values.
    Count,
}

impl Reducer {
    /// Reduce a group of optional values.
    ///
    /// `NaN` counts as missing.
    ///
    /// ```
    /// use envdb_types::Reducer;
    ///
    /// let g = [Some(1.0), None, Some(3.0)];
    /// assert_eq!(Reducer::Mean.reduce(g), Some(2.0));
    /// assert_eq!(Reducer::Count.reduce([None]), Some(0.0));
    /// assert_eq!(Reducer::Sum.reduce([None]), None);
    /// ```
    pub fn reduce<I>(self, values: I) -> Option<f64>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut present: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let n = present.len() as f64;
        match self {
            Self::Count => Some(n),
            _ if present.is_empty() => None,
            Self::Sum => Some(present.iter().sum()),
            Self::Mean => Some(present.iter().sum::<f64>() / n),
            Self::Min => present.iter().copied().reduce(f64::min),
            Self::Max => present.iter().copied().reduce(f64::max),
            Self::First => present.first().copied(),
            Self::Last => present.last().copied(),
            Self::Median => {
                present.sort_by(f64::total_cmp);
                let mid = present.len() / 2;
                if present.len() % 2 == 0 {
                    Some((present[mid - 1] + present[mid]) / 2.0)
                } else {
                    Some(present[mid])
                }
            }
        }
    }
}

/// Explicit reducer-per-column configuration.
///
/// Columns without an override use `default`. Unit categories (counts summed,
/// percentages averaged, ...) are registered with [`AggregationPlan::with_category`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationPlan {
    /// Reducer for columns without an override.
    pub default: Reducer,
    /// Column name to reducer.
    pub overrides: BTreeMap<String, Reducer>,
}

impl AggregationPlan {
    /// Plan applying `default` to every column.
    #[must_use]
    pub const fn new(default: Reducer) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Override the reducer of one column.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>, reducer: Reducer) -> Self {
        self.overrides.insert(column.into(), reducer);
        self
    }

    /// Register one reducer for a whole unit category of columns.
    #[must_use]
    pub fn with_category<I, S>(mut self, reducer: Reducer, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for c in columns {
            self.overrides.insert(c.into(), reducer);
        }
        self
    }

    /// Resolve the plan against a concrete column list.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, columns: &[S]) -> ResolvedPlan {
        ResolvedPlan {
            reducers: columns
                .iter()
                .map(|c| {
                    let name = c.as_ref();
                    let r = self.overrides.get(name).copied().unwrap_or(self.default);
                    (name.to_string(), r)
                })
                .collect(),
        }
    }
}

/// An [`AggregationPlan`] bound to a column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlan {
    reducers: Vec<(String, Reducer)>,
}

impl ResolvedPlan {
    /// Reducer of the column at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds for the resolved column list.
    #[must_use]
    pub fn reducer(&self, index: usize) -> Reducer {
        self.reducers[index].1
    }

    /// Reducer of a column by name.
    #[must_use]
    pub fn reducer_for(&self, column: &str) -> Option<Reducer> {
        self.reducers
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, r)| *r)
    }

    /// Resolved `(column, reducer)` pairs in column order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, Reducer)> {
        self.reducers.iter().map(|(c, r)| (c.as_str(), *r))
    }

    /// Number of resolved columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// True when no columns were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}
