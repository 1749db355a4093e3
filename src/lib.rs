//! Per-application screen time aggregation
//!
//! Turns overlapping, bucketed usage records into one ranked total per
//! application, falling back to raw interval records whenever the
//! pre-aggregated summary for a window comes back empty.

pub mod cli;
pub mod config;
pub mod services;
pub mod sources;
pub mod types;
