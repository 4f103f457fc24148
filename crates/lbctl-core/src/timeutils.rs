use crate::error::{Error, Result};
use crate::models::TimeWindow;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// Length of the window used when `--start` is omitted.
pub const DEFAULT_WINDOW: Duration = Duration::minutes(30);

/// Source of "now" for anything that defaults to the current instant.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        now_utc()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Converts the fractional unix seconds used by the API for sample timestamps.
pub fn utc_from_unix_seconds(ts: f64) -> Option<OffsetDateTime> {
    if !ts.is_finite() {
        return None;
    }
    let nanos = (ts * 1_000_000_000.0).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}

pub fn parse_rfc3339(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339).ok()
}

pub fn format_rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

/// Builds the query window from optional `--start`/`--end` values.
///
/// A missing `end` is the clock's current instant and a missing `start` is
/// [`DEFAULT_WINDOW`] before the resolved `end`. The bounds are not compared
/// against each other; an inverted window is left for the API to reject.
pub fn resolve_window(
    start: Option<&str>,
    end: Option<&str>,
    clock: &dyn Clock,
) -> Result<TimeWindow> {
    let now = clock.now();
    let end = match end {
        Some(raw) => parse_bound("end", raw, now)?,
        None => now,
    };
    let start = match start {
        Some(raw) => parse_bound("start", raw, now)?,
        None => end - DEFAULT_WINDOW,
    };
    Ok(TimeWindow { start, end })
}

fn parse_bound(field: &'static str, raw: &str, now: OffsetDateTime) -> Result<OffsetDateTime> {
    parse_rfc3339(raw).ok_or_else(|| Error::InvalidTimeFormat {
        field,
        example: format_rfc3339(now),
    })
}
