use thiserror::Error;

/// usagetally error types
#[derive(Error, Debug)]
pub enum UsageTallyError {
    /// Failed to parse JSON/JSONL
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Usage data source unavailable
    #[error("source error: {0}")]
    Source(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for usagetally
pub type Result<T> = std::result::Result<T, UsageTallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UsageTallyError::Parse("invalid json".into());
        assert_eq!(err.to_string(), "parse error: invalid json");
    }

    #[test]
    fn test_source_error_display() {
        let err = UsageTallyError::Source("data directory missing".into());
        assert_eq!(err.to_string(), "source error: data directory missing");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: UsageTallyError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }
}
