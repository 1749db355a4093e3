//! Query window arguments shared by the reporting subcommands

use chrono::{DateTime, Local};
use clap::Args;

use crate::types::Window;

/// Time window selection (defaults to today)
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct WindowArgs {
    /// Window start in epoch milliseconds
    #[arg(long, requires = "end", conflicts_with_all = ["today", "days"])]
    pub start: Option<i64>,

    /// Window end in epoch milliseconds
    #[arg(long, requires = "start")]
    pub end: Option<i64>,

    /// From local midnight until now
    #[arg(long, conflicts_with = "days")]
    pub today: bool,

    /// The last N calendar days including today
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: Option<u32>,
}

impl WindowArgs {
    pub fn resolve(&self, now: DateTime<Local>) -> Window {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            return Window::new(start, end);
        }
        match self.days {
            Some(days) => Window::last_days(now, days),
            None => Window::today(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_range() {
        let args = WindowArgs {
            start: Some(10),
            end: Some(20),
            ..Default::default()
        };
        assert_eq!(args.resolve(Local::now()), Window::new(10, 20));
    }

    #[test]
    fn test_resolve_defaults_to_today() {
        let now = Local::now();
        assert_eq!(WindowArgs::default().resolve(now), Window::today(now));
    }

    #[test]
    fn test_resolve_days() {
        let now = Local::now();
        let args = WindowArgs {
            days: Some(7),
            ..Default::default()
        };
        assert_eq!(args.resolve(now), Window::last_days(now, 7));
    }
}
