//! Attribution types for merged source spans.

use serde::{Deserialize, Serialize};

/// A continuous span of timestamps [start..=end].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start timestamp (seconds since epoch).
    pub start: i64,
    /// Inclusive end timestamp (seconds since epoch).
    pub end: i64,
}

impl Span {
    /// Build a span; bounds are swapped if given in reverse.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Common part of two spans, if any.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }

    /// True when `ts` lies inside the span.
    #[must_use]
    pub const fn contains(&self, ts: i64) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Span contributed by one named source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Source name.
    pub source: String,
    /// First and last timestamp of the source after resampling.
    pub span: Span,
}

/// Attribution of a merged table: which source covered which time range.
///
/// Behavior:
/// - Built by the outer merge from each resampled source's first and last
///   timestamp, in source order.
/// - Used to reject source sets with no common range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attribution {
    /// Collected spans in source order.
    pub spans: Vec<SourceSpan>,
}

impl Attribution {
    /// Create an empty attribution container.
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: vec![] }
    }

    /// Record a source span contribution.
    pub fn push(&mut self, source: impl Into<String>, span: Span) {
        self.spans.push(SourceSpan {
            source: source.into(),
            span,
        });
    }

    /// Range covered by every source, `None` when they share no instant.
    #[must_use]
    pub fn common_span(&self) -> Option<Span> {
        let mut it = self.spans.iter().map(|s| s.span);
        let first = it.next()?;
        it.try_fold(first, |acc, s| acc.intersect(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_span_intersects_all_sources() {
        let mut a = Attribution::new();
        a.push("hydrophone", Span::new(0, 100));
        a.push("probe", Span::new(50, 200));
        a.push("weather", Span::new(80, 90));
        assert_eq!(a.common_span(), Some(Span::new(80, 90)));

        a.push("late", Span::new(150, 160));
        assert_eq!(a.common_span(), None);
    }

    #[test]
    fn touching_spans_overlap() {
        assert_eq!(Span::new(0, 10).intersect(&Span::new(10, 20)), Some(Span::new(10, 10)));
    }
}
