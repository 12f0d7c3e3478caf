// Core modules
pub mod config;
pub mod error;
pub mod feed;
pub mod indicators;
pub mod models;
pub mod monitor;
pub mod strategy;
pub mod window;

// Re-export commonly used types
pub use crate::config::MonitorConfig;
pub use models::*;
pub use monitor::TrendMonitor;
pub use strategy::Strategy;
pub use window::{SampleWindow, TrendDirection, TrendLine};

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
