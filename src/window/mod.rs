// Bounded sample window and trend classification
pub mod sample_window;

pub use sample_window::SampleWindow;

use serde::{Deserialize, Serialize};

/// Least-squares line fitted over a window's percentage-change series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    /// `atan(slope)` in degrees
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Classify an angle (degrees) against a threshold
    ///
    /// - Up: angle > threshold
    /// - Down: angle < -threshold
    /// - Flat: |angle| < threshold
    ///
    /// An angle exactly on the threshold matches none of them and yields `None`.
    /// With a negative threshold the up/down tests are checked first.
    pub fn from_angle(angle: f64, threshold: f64) -> Option<Self> {
        if angle > threshold {
            Some(TrendDirection::Up)
        } else if angle < -threshold {
            Some(TrendDirection::Down)
        } else if angle.abs() < threshold {
            Some(TrendDirection::Flat)
        } else {
            None
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Flat => "flat",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_angle() {
        assert_eq!(TrendDirection::from_angle(10.0, 5.0), Some(TrendDirection::Up));
        assert_eq!(TrendDirection::from_angle(-10.0, 5.0), Some(TrendDirection::Down));
        assert_eq!(TrendDirection::from_angle(2.0, 5.0), Some(TrendDirection::Flat));
        assert_eq!(TrendDirection::from_angle(5.0, 5.0), None);
        assert_eq!(TrendDirection::from_angle(-5.0, 5.0), None);
        assert_eq!(TrendDirection::from_angle(f64::NAN, 5.0), None);
    }

    #[test]
    fn test_zero_threshold_has_no_flat() {
        assert_eq!(TrendDirection::from_angle(0.0, 0.0), None);
        assert_eq!(TrendDirection::from_angle(0.1, 0.0), Some(TrendDirection::Up));
    }
}
