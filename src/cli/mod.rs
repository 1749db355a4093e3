mod window;

pub use window::WindowArgs;

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::QueryConfig;
use crate::services::UsageService;
use crate::types::{AppUsageEntry, Result, UsageTallyError, Window};

/// Per-application screen time report
#[derive(Parser)]
#[command(name = "usagetally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing exported *.jsonl usage files
    #[arg(long, global = true, env = "USAGETALLY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Count foreground time only (for exports without visible time)
    #[arg(long, global = true)]
    no_visible_time: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show total screen time for a window
    Total {
        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-app usage ranked by time (default)
    Apps {
        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show at most N apps
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Check whether usage data is available
    Access {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = QueryConfig::new(self.data_dir, !self.no_visible_time);
        let service = UsageService::from_config(&config)?;
        let now = Local::now();

        let output = match self.command {
            Some(Commands::Total { window, json }) => {
                let window = window.resolve(now);
                render_total(service.total_for_period(window), window, json)?
            }
            Some(Commands::Apps {
                window,
                json,
                limit,
            }) => {
                let mut apps = service.app_usage_list(window.resolve(now));
                if let Some(limit) = limit {
                    apps.truncate(limit);
                }
                render_apps(&apps, json)?
            }
            Some(Commands::Access { json }) => {
                render_access(service.is_access_granted(now.timestamp_millis()), json)?
            }
            None => render_apps(&service.app_usage_list(Window::today(now)), false)?,
        };

        println!("{}", output);
        Ok(())
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| UsageTallyError::Parse(e.to_string()))
}

/// Format milliseconds as `1h 02m 03s`
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

fn render_total(total_ms: u64, window: Window, json: bool) -> Result<String> {
    if json {
        return to_json(&serde_json::json!({
            "start": window.start,
            "end": window.end,
            "usageTime": total_ms,
        }));
    }
    Ok(format!("Screen time: {} ({} ms)", format_duration(total_ms), total_ms))
}

fn render_apps(apps: &[AppUsageEntry], json: bool) -> Result<String> {
    if json {
        return to_json(apps);
    }
    if apps.is_empty() {
        return Ok("No app usage in this window".to_string());
    }

    let name_width = apps
        .iter()
        .map(|a| a.app_name.chars().count())
        .max()
        .unwrap_or(0);
    let lines: Vec<String> = apps
        .iter()
        .enumerate()
        .map(|(i, app)| {
            format!(
                "{:>3}. {:<width$}  {:>12}  {}",
                i + 1,
                app.app_name,
                format_duration(app.usage_time),
                app.package_name,
                width = name_width
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

fn render_access(granted: bool, json: bool) -> Result<String> {
    if json {
        return to_json(&serde_json::json!({ "granted": granted }));
    }
    Ok(if granted {
        "Usage data available".to_string()
    } else {
        "No usage data available (check the export directory)".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(package: &str, name: &str, ms: u64) -> AppUsageEntry {
        AppUsageEntry {
            package_name: package.into(),
            app_name: name.into(),
            usage_time: ms,
        }
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["usagetally"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_visible_time);
    }

    #[test]
    fn test_cli_parse_total_json() {
        let cli = Cli::try_parse_from(["usagetally", "total", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Total { json: true, .. })));
    }

    #[test]
    fn test_cli_parse_apps_range() {
        let cli = Cli::try_parse_from([
            "usagetally",
            "apps",
            "--start",
            "1000",
            "--end",
            "2000",
            "--limit",
            "5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Apps { window, limit, .. }) => {
                assert_eq!(window.start, Some(1000));
                assert_eq!(window.end, Some(2000));
                assert_eq!(limit, Some(5));
            }
            _ => panic!("expected apps command"),
        }
    }

    #[test]
    fn test_cli_start_requires_end() {
        assert!(Cli::try_parse_from(["usagetally", "total", "--start", "1000"]).is_err());
    }

    #[test]
    fn test_cli_today_conflicts_with_days() {
        assert!(Cli::try_parse_from(["usagetally", "apps", "--today", "--days", "3"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "usagetally",
            "access",
            "--no-visible-time",
            "--data-dir",
            "/tmp/usage",
        ])
        .unwrap();
        assert!(cli.no_visible_time);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/usage")));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(999), "0s");
        assert_eq!(format_duration(45_000), "45s");
        assert_eq!(format_duration(125_000), "2m 05s");
        assert_eq!(format_duration(3_723_000), "1h 02m 03s");
        assert_eq!(format_duration(90_000_000), "25h 00m 00s");
    }

    #[test]
    fn test_render_total_text() {
        let out = render_total(3_723_000, Window::new(0, 1), false).unwrap();
        assert_eq!(out, "Screen time: 1h 02m 03s (3723000 ms)");
    }

    #[test]
    fn test_render_total_json() {
        let out = render_total(1500, Window::new(10, 20), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["usageTime"], 1500);
        assert_eq!(value["start"], 10);
        assert_eq!(value["end"], 20);
    }

    #[test]
    fn test_render_apps_json_keeps_order() {
        let apps = vec![
            entry("com.example.video", "Video", 9000),
            entry("com.example.chat", "Chat", 3000),
        ];
        let out = render_apps(&apps, true).unwrap();
        let parsed: Vec<AppUsageEntry> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, apps);
        assert!(out.contains("\"packageName\""));
    }

    #[test]
    fn test_render_apps_table() {
        let apps = vec![
            entry("com.example.video", "Video", 3_600_000),
            entry("com.example.chat", "Chat", 65_000),
        ];
        let out = render_apps(&apps, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. Video"));
        assert!(lines[0].contains("1h 00m 00s"));
        assert!(lines[1].contains("com.example.chat"));
    }

    #[test]
    fn test_render_apps_empty() {
        assert_eq!(render_apps(&[], false).unwrap(), "No app usage in this window");
        assert_eq!(render_apps(&[], true).unwrap(), "[]");
    }

    #[test]
    fn test_render_access() {
        let out = render_access(true, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["granted"], true);
        assert_eq!(render_access(true, false).unwrap(), "Usage data available");
    }
}
