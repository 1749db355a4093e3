//! JSONL interval-file source
//!
//! Reads exported usage buckets from `<data_dir>/**/*.jsonl`, one interval
//! per line:
//!
//! ```text
//! {"packageName":"com.example.chat","firstTimestamp":1700000000000,
//!  "lastTimestamp":1700086400000,"totalTimeInForeground":120000,
//!  "totalTimeVisible":150000}
//! ```

use crate::types::{PrimarySummary, Result, UsageRecord, UsageTallyError, Window};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::{summarize, UsageSource};

/// One exported interval line
#[derive(Deserialize)]
struct IntervalLine<'a> {
    #[serde(rename = "packageName")]
    package_name: &'a str,
    #[serde(rename = "firstTimestamp", default)]
    first_timestamp: Option<i64>,
    #[serde(rename = "lastTimestamp", default)]
    last_timestamp: Option<i64>,
    #[serde(rename = "totalTimeInForeground", default)]
    total_time_in_foreground: i64,
    #[serde(rename = "totalTimeVisible", default)]
    total_time_visible: Option<i64>,
}

/// File-backed usage source
pub struct JsonlSource {
    data_dir: PathBuf,
}

impl JsonlSource {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Parse a single JSONL line; negative times clamp to zero
    fn parse_line(line: &mut [u8]) -> Option<UsageRecord> {
        if line.is_empty() {
            return None;
        }

        let data: IntervalLine = simd_json::from_slice(line).ok()?;
        if data.package_name.is_empty() {
            return None;
        }

        Some(UsageRecord {
            application_id: data.package_name.to_string(),
            interval_foreground_time: data.total_time_in_foreground.max(0) as u64,
            interval_visible_time: data.total_time_visible.map(|v| v.max(0) as u64),
            first_timestamp: data.first_timestamp,
            last_timestamp: data.last_timestamp,
        })
    }

    /// Parse every record in one file
    fn parse_file(path: &Path) -> Result<Vec<UsageRecord>> {
        let file = File::open(path).map_err(UsageTallyError::Io)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_no, line_result) in reader.lines().enumerate() {
            let line = match line_result {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(
                        file = %path.display(),
                        line = line_no + 1,
                        error = %e,
                        "skipping unreadable usage line"
                    );
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let mut line_bytes = line.into_bytes();
            match Self::parse_line(&mut line_bytes) {
                Some(record) => records.push(record),
                None => tracing::warn!(
                    file = %path.display(),
                    line = line_no + 1,
                    "skipping malformed usage line"
                ),
            }
        }

        Ok(records)
    }

    /// Collect all interval files under the data directory
    fn collect_files(&self) -> Vec<PathBuf> {
        let pattern = self.data_dir.join("**").join("*.jsonl");
        glob::glob(&pattern.to_string_lossy())
            .map(|paths| paths.filter_map(|e| e.ok()).collect())
            .unwrap_or_default()
    }

    /// Load every record from every file, in parallel.
    ///
    /// Files come back in path order so results do not depend on thread
    /// scheduling.
    fn load_all(&self) -> Result<Vec<UsageRecord>> {
        if !self.data_dir.is_dir() {
            return Err(UsageTallyError::Source(format!(
                "usage data directory not found: {}",
                self.data_dir.display()
            )));
        }

        let mut files = self.collect_files();
        files.sort();

        let per_file: Vec<Vec<UsageRecord>> = files
            .par_iter()
            .map(|f| match Self::parse_file(f) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(file = %f.display(), error = %e, "failed to read usage file");
                    Vec::new()
                }
            })
            .collect();

        let records: Vec<UsageRecord> = per_file.into_iter().flatten().collect();
        tracing::debug!(files = files.len(), records = records.len(), "loaded usage records");
        Ok(records)
    }
}

impl UsageSource for JsonlSource {
    fn name(&self) -> &str {
        "jsonl"
    }

    /// Only intervals lying wholly inside the window are summarised, so a
    /// window shorter than one bucket yields an empty summary.
    fn query_summary(&self, window: Window) -> Result<PrimarySummary> {
        let records = self.load_all()?;
        Ok(summarize(records.iter().filter(|r| r.is_within(&window))))
    }

    fn query_intervals(&self, window: Window) -> Result<Vec<UsageRecord>> {
        let records = self.load_all()?;
        Ok(records.into_iter().filter(|r| r.overlaps(&window)).collect())
    }
}
