use crate::error::ConfigError;
use crate::feed::MarketScenario;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ENV_PREFIX: &str = "TRENDWATCH";

/// Runtime settings for the trend monitor
///
/// Layered lowest to highest: defaults, optional TOML file, `TRENDWATCH_*`
/// environment variables. CLI flags are applied on top by the binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Samples kept per symbol
    pub capacity: usize,
    /// Trend angle (degrees) separating up/down from flat
    pub threshold: f64,
    /// Recent samples that must agree with a signal (0 = off)
    pub confirm_lookback: usize,
    pub symbols: Vec<String>,
    pub scenario: MarketScenario,
    /// Synthetic samples per symbol
    pub samples: usize,
    pub seed: u64,
    /// Delay between samples, 0 = as fast as possible
    pub interval_ms: u64,
    pub log_filter: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            threshold: 5.0,
            confirm_lookback: 0,
            symbols: vec!["SOL".to_string()],
            scenario: MarketScenario::Uptrend,
            samples: 200,
            seed: 42,
            interval_ms: 0,
            log_filter: "trendwatch=info".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from an optional file plus the environment
    ///
    /// The result is not validated, so callers can layer further overrides
    /// first and then call [`MonitorConfig::validate`] once.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("symbols"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be greater than zero".into()));
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        if self.confirm_lookback > self.capacity {
            return Err(ConfigError::Invalid(format!(
                "confirm_lookback ({}) cannot exceed capacity ({})",
                self.confirm_lookback, self.capacity
            )));
        }
        if self.symbols.is_empty() || self.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("at least one non-empty symbol is required".into()));
        }
        Ok(())
    }
}
