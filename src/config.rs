//! Query configuration resolved once at start-up

use directories::BaseDirs;
use std::path::PathBuf;

/// Settings shared by every query the service runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Directory holding exported `*.jsonl` interval files and `names.json`
    pub data_dir: PathBuf,
    /// Whether visible time is meaningful for the exported data
    pub supports_visible_time: bool,
}

impl QueryConfig {
    pub fn new(data_dir: Option<PathBuf>, supports_visible_time: bool) -> Self {
        Self {
            data_dir: data_dir.unwrap_or_else(default_data_dir),
            supports_visible_time,
        }
    }

    pub fn names_path(&self) -> PathBuf {
        self.data_dir.join("names.json")
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(None, true)
    }
}

/// `~/.usagetally/data`, or `./.usagetally/data` without a home directory
pub fn default_data_dir() -> PathBuf {
    let home = BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| {
            tracing::warn!("could not determine home directory");
            PathBuf::from(".")
        });
    home.join(".usagetally").join("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_dir_suffix() {
        let dir = default_data_dir();
        assert!(dir.ends_with(".usagetally/data"));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = QueryConfig::new(Some(PathBuf::from("/tmp/usage")), false);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/usage"));
        assert!(!config.supports_visible_time);
        assert_eq!(config.names_path(), PathBuf::from("/tmp/usage/names.json"));
    }

    #[test]
    fn test_default_supports_visible_time() {
        let config = QueryConfig::default();
        assert!(config.supports_visible_time);
        assert_eq!(config.data_dir, default_data_dir());
    }
}
