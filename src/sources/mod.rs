//! Usage data sources feeding the aggregator

mod jsonl;

pub use jsonl::JsonlSource;

use crate::types::{PrimarySummary, Result, UsageRecord, Window};

/// A provider of raw usage data for a time window
pub trait UsageSource: Send + Sync {
    /// Source name (e.g., "jsonl")
    fn name(&self) -> &str;

    /// Pre-aggregated usage keyed by application id.
    /// May be empty for windows the source cannot summarise.
    fn query_summary(&self, window: Window) -> Result<PrimarySummary>;

    /// Raw per-interval records intersecting the window
    fn query_intervals(&self, window: Window) -> Result<Vec<UsageRecord>>;
}

/// Merge records into one entry per application, in the way platform
/// aggregate queries collapse daily buckets.
pub fn summarize<'a, I>(records: I) -> PrimarySummary
where
    I: IntoIterator<Item = &'a UsageRecord>,
{
    let mut summary = PrimarySummary::new();
    for record in records {
        match summary.get_mut(&record.application_id) {
            Some(existing) => existing.merge(record),
            None => {
                summary.insert(record.application_id.clone(), record.clone());
            }
        }
    }
    summary
}
