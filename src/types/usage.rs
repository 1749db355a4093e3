//! Usage types for per-application screen time

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reporting interval's usage for one application.
///
/// Times are milliseconds. Several records may share an `application_id`
/// within one query window because data sources bucket by day or interval,
/// not by the requested range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub application_id: String,
    pub interval_foreground_time: u64,
    /// Absent on older data sources
    #[serde(default)]
    pub interval_visible_time: Option<u64>,
    /// Start of the covered interval (epoch ms), if the source reports it
    #[serde(default)]
    pub first_timestamp: Option<i64>,
    /// End of the covered interval (epoch ms), if the source reports it
    #[serde(default)]
    pub last_timestamp: Option<i64>,
}

impl UsageRecord {
    pub fn new(application_id: impl Into<String>, foreground_ms: u64) -> Self {
        Self {
            application_id: application_id.into(),
            interval_foreground_time: foreground_ms,
            interval_visible_time: None,
            first_timestamp: None,
            last_timestamp: None,
        }
    }

    pub fn with_visible(mut self, visible_ms: u64) -> Self {
        self.interval_visible_time = Some(visible_ms);
        self
    }

    pub fn with_interval(mut self, first: i64, last: i64) -> Self {
        self.first_timestamp = Some(first);
        self.last_timestamp = Some(last);
        self
    }

    /// Time this record contributes to its application's total.
    ///
    /// With visible time supported, the larger of visible and foreground
    /// time is taken; otherwise foreground time alone.
    pub fn selected_time(&self, supports_visible_time: bool) -> u64 {
        if supports_visible_time {
            self.interval_visible_time
                .unwrap_or(0)
                .max(self.interval_foreground_time)
        } else {
            self.interval_foreground_time
        }
    }

    /// Whether the record's interval intersects `window`.
    /// Records without timestamps are assumed to cover the window.
    pub fn overlaps(&self, window: &Window) -> bool {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => first < window.end && last > window.start,
            _ => !window.is_reversed(),
        }
    }

    /// Whether the record's interval lies entirely inside `window`.
    pub fn is_within(&self, window: &Window) -> bool {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => first >= window.start && last <= window.end,
            _ => !window.is_reversed(),
        }
    }

    /// Fold another interval of the same application into this one.
    pub fn merge(&mut self, other: &UsageRecord) {
        self.interval_foreground_time = self
            .interval_foreground_time
            .saturating_add(other.interval_foreground_time);
        self.interval_visible_time =
            match (self.interval_visible_time, other.interval_visible_time) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
            };
        self.first_timestamp = min_opt(self.first_timestamp, other.first_timestamp);
        self.last_timestamp = max_opt(self.last_timestamp, other.last_timestamp);
    }
}

fn min_opt(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_opt(a: Option<i64>, b: Option<i64>) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Pre-aggregated usage keyed by application id.
///
/// Ordered so that iteration, and therefore tie-breaking during ranking,
/// is deterministic.
pub type PrimarySummary = BTreeMap<String, UsageRecord>;

/// Total usage for one application within a window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedTotal {
    pub application_id: String,
    pub usage_time: u64,
}

/// Totals ranked by usage descending, no zero entries
pub type AggregationResult = Vec<AggregatedTotal>;

/// Requested query range in epoch milliseconds.
///
/// `start <= end` is expected but not enforced; a reversed window simply
/// matches no data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub end: i64,
}

impl Window {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    /// Local midnight today up to `now`
    pub fn today(now: DateTime<Local>) -> Self {
        Self::last_days(now, 1)
    }

    /// The last `days` calendar days including today, ending at `now`.
    /// Zero is treated as one.
    pub fn last_days(now: DateTime<Local>, days: u32) -> Self {
        let back = i64::from(days.max(1) - 1);
        let first_day = now
            .date_naive()
            .checked_sub_signed(chrono::Duration::days(back))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start: local_midnight_ms(first_day),
            end: now.timestamp_millis(),
        }
    }

    /// The `span_ms` milliseconds immediately before `now_ms`
    pub fn trailing(now_ms: i64, span_ms: i64) -> Self {
        Self {
            start: now_ms.saturating_sub(span_ms),
            end: now_ms,
        }
    }
}

/// Start of `date` in local time as epoch milliseconds.
fn local_midnight_ms(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(dt) = Local.from_local_datetime(&midnight).earliest() {
        return dt.timestamp_millis();
    }
    // DST spring-forward: midnight doesn't exist, use 01:00
    let fallback = midnight + chrono::Duration::hours(1);
    match Local.from_local_datetime(&fallback).earliest() {
        Some(dt) => dt.timestamp_millis(),
        None => midnight.and_utc().timestamp_millis(),
    }
}

/// One row of the per-app breakdown handed to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppUsageEntry {
    pub package_name: String,
    pub app_name: String,
    /// Milliseconds
    pub usage_time: u64,
}
