//! Host-side query service
//!
//! Acquires raw data from a [`UsageSource`], runs the [`Aggregator`] and
//! resolves display names. Acquisition failures degrade to zero or an empty
//! list instead of surfacing to the caller.

use crate::config::QueryConfig;
use crate::services::names::{display_name_or_id, DisplayNameResolver, NameCatalog};
use crate::services::Aggregator;
use crate::sources::{JsonlSource, UsageSource};
use crate::types::{AppUsageEntry, PrimarySummary, Result, UsageRecord, UsageTallyError, Window};

/// Span probed by [`UsageService::is_access_granted`]
pub const ACCESS_PROBE_MS: i64 = 60_000;

pub struct UsageService {
    source: Box<dyn UsageSource>,
    names: Box<dyn DisplayNameResolver>,
    supports_visible_time: bool,
}

impl UsageService {
    pub fn new(
        source: Box<dyn UsageSource>,
        names: Box<dyn DisplayNameResolver>,
        supports_visible_time: bool,
    ) -> Self {
        Self {
            source,
            names,
            supports_visible_time,
        }
    }

    /// Build a service over the JSONL export in `config.data_dir`
    pub fn from_config(config: &QueryConfig) -> Result<Self> {
        if config.data_dir.is_file() {
            return Err(UsageTallyError::Config(format!(
                "data dir is a file: {}",
                config.data_dir.display()
            )));
        }
        let names_path = config.names_path();
        let names = match NameCatalog::load(&names_path) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(
                    file = %names_path.display(),
                    error = %e,
                    "ignoring unreadable name catalog, showing identifiers"
                );
                NameCatalog::default()
            }
        };
        tracing::debug!(
            data_dir = %config.data_dir.display(),
            names = names.len(),
            "usage service configured"
        );
        Ok(Self::new(
            Box::new(JsonlSource::new(config.data_dir.clone())),
            Box::new(names),
            config.supports_visible_time,
        ))
    }

    /// Total foreground time in `window`, in milliseconds
    pub fn total_for_period(&self, window: Window) -> u64 {
        match self.acquire(window) {
            Ok((primary, fallback)) => Aggregator::total_usage(&primary, &fallback),
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    error = %e,
                    "usage total unavailable"
                );
                0
            }
        }
    }

    /// Ranked per-application usage in `window` with display names
    pub fn app_usage_list(&self, window: Window) -> Vec<AppUsageEntry> {
        let (primary, fallback) = match self.acquire(window) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    error = %e,
                    "usage list unavailable"
                );
                return Vec::new();
            }
        };

        let totals =
            Aggregator::aggregate(&primary, &fallback, window, self.supports_visible_time);
        tracing::info!(apps = totals.len(), "aggregated usage");

        totals
            .into_iter()
            .map(|t| AppUsageEntry {
                app_name: display_name_or_id(self.names.as_ref(), &t.application_id),
                package_name: t.application_id,
                usage_time: t.usage_time,
            })
            .collect()
    }

    /// Whether the source currently yields any usage data.
    ///
    /// Probes the minute before `now_ms`; an unavailable source or an empty
    /// probe both count as not granted.
    pub fn is_access_granted(&self, now_ms: i64) -> bool {
        match self
            .source
            .query_intervals(Window::trailing(now_ms, ACCESS_PROBE_MS))
        {
            Ok(records) => !records.is_empty(),
            Err(e) => {
                tracing::debug!(error = %e, "access probe failed");
                false
            }
        }
    }

    /// Query the summary, and the raw intervals only if the summary is empty
    fn acquire(&self, window: Window) -> Result<(PrimarySummary, Vec<UsageRecord>)> {
        if window.is_reversed() {
            tracing::warn!(
                start = window.start,
                end = window.end,
                "window start is after end"
            );
        }

        let primary = self.source.query_summary(window)?;
        if !primary.is_empty() {
            tracing::debug!(apps = primary.len(), "using primary summary");
            return Ok((primary, Vec::new()));
        }

        let fallback = self.source.query_intervals(window)?;
        tracing::debug!(
            records = fallback.len(),
            "primary summary empty, using interval records"
        );
        Ok((primary, fallback))
    }
}
