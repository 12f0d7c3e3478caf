// Trading signal evaluation on top of sample windows
pub mod trend_following;

pub use trend_following::TrendFollowingStrategy;

use crate::models::Signal;
use crate::window::SampleWindow;
use crate::Result;

/// Base trait for all trading strategies
pub trait Strategy: Send + Sync {
    /// Generate a trading signal from a symbol's sample window
    fn generate_signal(&self, window: &SampleWindow) -> Result<Signal>;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Minimum samples a window must hold before signals are generated
    fn min_samples_required(&self) -> usize;
}
