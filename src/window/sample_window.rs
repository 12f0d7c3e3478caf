use super::{TrendDirection, TrendLine};
use crate::error::WindowError;
use crate::indicators::{fit_line, slope_to_angle, sub_window_relative_change, window_relative_change};

/// Fixed-capacity window of numeric samples with trend detection
///
/// Samples live in a pre-allocated circular store. Once `capacity` values
/// have been written, each `add` overwrites the oldest sample. A parallel
/// percentage-change series is maintained at insertion time and a line is
/// fitted over it to classify the trend against `threshold` (degrees).
///
/// Not synchronized: wrap it in a lock when it is shared between threads
/// (see `TrendMonitor`).
#[derive(Debug, Clone)]
pub struct SampleWindow {
    capacity: usize,
    threshold: f64,
    samples: Vec<f64>,
    percentage_change: Vec<f64>,
    sum: f64,
    cursor: usize,
    full: bool,
}

impl SampleWindow {
    /// Create an empty window
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of retained samples, must be > 0
    /// * `threshold` - Trend angle in degrees separating up/down from flat
    pub fn new(capacity: usize, threshold: f64) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::InvalidCapacity);
        }

        Ok(Self {
            capacity,
            threshold,
            samples: vec![0.0; capacity],
            percentage_change: vec![0.0; capacity],
            sum: 0.0,
            cursor: 0,
            full: false,
        })
    }

    /// Insert a sample, evicting the oldest one once the window is full
    ///
    /// The percentage-change entry is taken against the oldest sample still
    /// retained after this write. Entries are never recomputed, so once the
    /// window has rolled over each entry is the return over the
    /// `capacity - 1` samples preceding it.
    pub fn add(&mut self, value: f64) {
        // Slot at the cursor is 0.0 until the window wraps for the first time
        self.sum += value - self.samples[self.cursor];
        self.samples[self.cursor] = value;

        let full_after_write = self.full || self.cursor + 1 == self.capacity;
        let oldest = if full_after_write {
            (self.cursor + 1) % self.capacity
        } else {
            0
        };
        self.percentage_change[self.cursor] = window_relative_change(value, self.samples[oldest]);

        self.cursor = (self.cursor + 1) % self.capacity;
        if self.cursor == 0 {
            self.full = true;
        }
    }

    /// Retained samples, oldest to newest
    pub fn get_elements(&self) -> Vec<f64> {
        self.unroll(&self.samples)
    }

    /// First `n` retained samples (oldest side)
    ///
    /// Empty until the window is full; `n` past capacity returns everything.
    pub fn get_first_n_elements(&self, n: usize) -> Vec<f64> {
        if !self.full {
            return Vec::new();
        }
        let mut elements = self.get_elements();
        elements.truncate(n.min(self.capacity));
        elements
    }

    /// Last `n` retained samples (newest side)
    ///
    /// Empty until the window is full; `n` past capacity returns everything.
    pub fn get_last_n_elements(&self, n: usize) -> Vec<f64> {
        if !self.full {
            return Vec::new();
        }
        let elements = self.get_elements();
        let start = self.capacity - n.min(self.capacity);
        elements[start..].to_vec()
    }

    /// Percentage-change series recorded at insertion, oldest to newest
    pub fn get_elements_percentage_change(&self) -> Vec<f64> {
        self.unroll(&self.percentage_change)
    }

    /// Percentage change over `get_first_n_elements(n)`, relative to its first element
    pub fn get_first_n_elements_percentage_change(&self, n: usize) -> Vec<f64> {
        sub_window_relative_change(&self.get_first_n_elements(n))
    }

    /// Percentage change over `get_last_n_elements(n)`, relative to its first element
    pub fn get_last_n_elements_percentage_change(&self, n: usize) -> Vec<f64> {
        sub_window_relative_change(&self.get_last_n_elements(n))
    }

    /// Sum of the retained samples
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity
        } else {
            self.cursor
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently inserted sample
    pub fn latest(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.cursor + self.capacity - 1) % self.capacity;
        Some(self.samples[idx])
    }

    /// Fit a line over the percentage-change series
    ///
    /// Recomputed on every call. Callers that need slope, intercept and angle
    /// from the same instant should use the returned `TrendLine`.
    pub fn get_trend(&self) -> TrendLine {
        let (slope, intercept) = fit_line(&self.get_elements_percentage_change());
        TrendLine {
            slope,
            intercept,
            angle: slope_to_angle(slope),
        }
    }

    pub fn get_slope(&self) -> f64 {
        self.get_trend().slope
    }

    pub fn get_intercept(&self) -> f64 {
        self.get_trend().intercept
    }

    /// Trend angle in degrees
    pub fn get_angle(&self) -> f64 {
        self.get_trend().angle
    }

    pub fn is_up(&self) -> bool {
        self.get_angle() > self.threshold
    }

    pub fn is_down(&self) -> bool {
        self.get_angle() < -self.threshold
    }

    pub fn is_flat(&self) -> bool {
        self.get_angle().abs() < self.threshold
    }

    /// Classify the current trend from a single fit
    ///
    /// Returns `None` when the angle sits exactly on `threshold`/`-threshold`
    /// (neither up, down nor flat) or is NaN.
    pub fn classify(&self) -> Option<TrendDirection> {
        TrendDirection::from_angle(self.get_angle(), self.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Unroll circular storage into insertion order
    fn unroll(&self, storage: &[f64]) -> Vec<f64> {
        if !self.full {
            return storage[..self.cursor].to_vec();
        }

        let mut out = Vec::with_capacity(self.capacity);
        out.extend_from_slice(&storage[self.cursor..]);
        out.extend_from_slice(&storage[..self.cursor]);
        out
    }
}
