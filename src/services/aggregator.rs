//! Aggregator service for computing per-application usage totals

use crate::types::{AggregatedTotal, AggregationResult, PrimarySummary, UsageRecord, Window};
use std::collections::HashMap;

/// Aggregator for computing usage statistics
pub struct Aggregator;

impl Aggregator {
    /// Per-application totals for `window`, ranked by usage descending.
    ///
    /// The primary summary is used whenever it has entries; the raw fallback
    /// records are only consulted when it is empty. Entries for the same
    /// application are summed, zero totals are dropped and ties keep the
    /// order in which applications were first seen. `window` only labels
    /// the query; records are expected to be selected for it by the source.
    pub fn aggregate(
        primary: &PrimarySummary,
        fallback: &[UsageRecord],
        _window: Window,
        supports_visible_time: bool,
    ) -> AggregationResult {
        let mut totals = RunningTotals::default();

        if primary.is_empty() {
            for record in fallback {
                totals.add(
                    &record.application_id,
                    record.selected_time(supports_visible_time),
                );
            }
        } else {
            for (application_id, record) in primary {
                totals.add(application_id, record.selected_time(supports_visible_time));
            }
        }

        let mut result: AggregationResult = totals
            .into_entries()
            .into_iter()
            .filter(|t| t.usage_time > 0)
            .collect();
        // sort_by is stable: ties keep insertion order
        result.sort_by(|a, b| b.usage_time.cmp(&a.usage_time));
        result
    }

    /// Total foreground time across every entry of the selected source
    pub fn total_usage(primary: &PrimarySummary, fallback: &[UsageRecord]) -> u64 {
        if primary.is_empty() {
            fallback
                .iter()
                .fold(0u64, |acc, r| acc.saturating_add(r.interval_foreground_time))
        } else {
            primary
                .values()
                .fold(0u64, |acc, r| acc.saturating_add(r.interval_foreground_time))
        }
    }
}

/// Insertion-ordered running totals, local to one aggregation call
#[derive(Default)]
struct RunningTotals {
    index: HashMap<String, usize>,
    entries: Vec<AggregatedTotal>,
}

impl RunningTotals {
    fn add(&mut self, application_id: &str, time_ms: u64) {
        match self.index.get(application_id) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.usage_time = entry.usage_time.saturating_add(time_ms);
            }
            None => {
                self.index.insert(application_id.to_string(), self.entries.len());
                self.entries.push(AggregatedTotal {
                    application_id: application_id.to_string(),
                    usage_time: time_ms,
                });
            }
        }
    }

    fn into_entries(self) -> Vec<AggregatedTotal> {
        self.entries
    }
}
