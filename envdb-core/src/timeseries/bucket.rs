use chrono::offset::{LocalResult, Offset};
use chrono::{Datelike, NaiveTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::normalize::day_start;
use crate::types::{Frequency, Instant};

const DAY: i64 = 86_400;

/// Floor `ts` onto the `step` grid of its own timezone.
///
/// - Whole-day steps start at local midnight; multi-day steps are aligned on
///   days since 0001-01-01 so that the grid does not depend on the data.
/// - Sub-day steps are aligned on local midnight. In a fall-back overlap the
///   bucket keeps the offset of `ts`, so the repeated hour stays a distinct
///   bucket. A bucket start inside a DST gap falls back to the UTC grid.
#[must_use]
pub fn bucket_floor(ts: &Instant, step: Frequency) -> Instant {
    let tz = ts.timezone();
    if step.is_calendar_days() {
        let days = step.seconds() / DAY;
        let date = ts.date_naive();
        let since_ce = i64::from(date.num_days_from_ce());
        let start = date - TimeDelta::days(since_ce.rem_euclid(days));
        return day_start(start, tz);
    }
    bucket_subdaily(ts, step.seconds(), tz)
}

/// Start of the bucket following the one starting at `bucket`.
#[must_use]
pub fn next_bucket(bucket: &Instant, step: Frequency) -> Instant {
    if step.is_calendar_days() {
        let date = bucket.date_naive() + TimeDelta::days(step.seconds() / DAY);
        return day_start(date, bucket.timezone());
    }
    bucket_floor(&(*bucket + step.as_delta()), step)
}

/// Every bucket start from `floor(first)` to `floor(last)`, inclusive.
#[must_use]
pub fn grid(first: &Instant, last: &Instant, step: Frequency) -> Vec<Instant> {
    let end = bucket_floor(last, step);
    let mut cur = bucket_floor(first, step);
    let mut out = Vec::new();
    while cur <= end {
        out.push(cur);
        let next = next_bucket(&cur, step);
        if next <= cur {
            break;
        }
        cur = next;
    }
    out
}

fn bucket_subdaily(ts: &Instant, step: i64, tz: Tz) -> Instant {
    let date = ts.date_naive();
    let seconds_since_midnight = i64::from(ts.num_seconds_from_midnight());
    let bucket_sec = seconds_since_midnight - seconds_since_midnight.rem_euclid(step);
    // Local midnight plus the bucket offset, resolved back through the zone
    let local_bucket_naive = date.and_time(NaiveTime::MIN) + TimeDelta::seconds(bucket_sec);
    match tz.from_local_datetime(&local_bucket_naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt1, dt2) => {
            let local_offset = ts.offset().fix().local_minus_utc();
            if dt1.offset().fix().local_minus_utc() == local_offset {
                dt1
            } else {
                dt2
            }
        }
        LocalResult::None => {
            let utc = ts.timestamp();
            let floored = utc - utc.rem_euclid(step);
            tz.timestamp_opt(floored, 0).earliest().unwrap_or(*ts)
        }
    }
}
