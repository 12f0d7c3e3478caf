// Per-symbol trend tracking
pub mod trend_monitor;

pub use trend_monitor::TrendMonitor;
