use thiserror::Error;

/// Construction-time contract violations for `SampleWindow`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowError {
    #[error("sample window capacity must be greater than zero")]
    InvalidCapacity,
}

/// Failures while reading price samples from a feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("failed to read price feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed span of {samples} samples every {interval_minutes}m is out of range")]
    SpanOutOfRange { samples: usize, interval_minutes: i64 },
}

/// Failures while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
