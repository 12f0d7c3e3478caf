use super::Strategy;
use crate::indicators::{fit_line, slope_to_angle};
use crate::models::Signal;
use crate::window::{SampleWindow, TrendDirection};
use crate::Result;

/// Trend-following strategy driven by the window's fitted angle
///
/// - Up trend → Buy
/// - Down trend → Sell
/// - Flat, or angle exactly on the threshold → Hold
///
/// On a rolled-over window the fitted series is a rolling return, so Up/Down
/// read as momentum strengthening/weakening rather than raw price direction.
///
/// With a confirmation lookback, a Buy/Sell is only kept when the line fitted
/// over the most recent `confirm_lookback` samples points the same way.
#[derive(Debug, Clone)]
pub struct TrendFollowingStrategy {
    capacity: usize,
    confirm_lookback: usize,
}

impl TrendFollowingStrategy {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            confirm_lookback: 0,
        }
    }

    /// Require the last `lookback` samples to agree with the window trend (0 disables)
    pub fn with_confirmation(mut self, lookback: usize) -> Self {
        self.confirm_lookback = lookback;
        self
    }

    pub fn confirm_lookback(&self) -> usize {
        self.confirm_lookback
    }

    /// Angle of the recent sub-window, relative to its own first sample
    fn recent_angle(&self, window: &SampleWindow) -> f64 {
        let series = window.get_last_n_elements_percentage_change(self.confirm_lookback);
        let (slope, _) = fit_line(&series);
        slope_to_angle(slope)
    }
}

impl Strategy for TrendFollowingStrategy {
    fn generate_signal(&self, window: &SampleWindow) -> Result<Signal> {
        let required = self.min_samples_required();
        if !window.is_full() || window.len() < required {
            return Err(format!(
                "Insufficient data: {} samples, need {}",
                window.len(),
                required.max(window.capacity())
            )
            .into());
        }

        let signal = match window.classify() {
            Some(TrendDirection::Up) => Signal::Buy,
            Some(TrendDirection::Down) => Signal::Sell,
            Some(TrendDirection::Flat) | None => Signal::Hold,
        };

        if signal == Signal::Hold || self.confirm_lookback < 2 {
            return Ok(signal);
        }

        let recent = self.recent_angle(window);
        let confirmed = match signal {
            Signal::Buy => recent > 0.0,
            Signal::Sell => recent < 0.0,
            Signal::Hold => true,
        };

        if !confirmed {
            tracing::debug!(
                signal = %signal,
                recent_angle = %recent,
                lookback = self.confirm_lookback,
                "Recent samples disagree with window trend, holding"
            );
            return Ok(Signal::Hold);
        }

        Ok(signal)
    }

    fn name(&self) -> &str {
        "TrendFollowingStrategy"
    }

    fn min_samples_required(&self) -> usize {
        self.capacity
    }
}
