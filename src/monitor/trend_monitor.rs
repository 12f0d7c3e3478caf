use crate::error::WindowError;
use crate::models::{PriceSnapshot, TrendReport};
use crate::window::{SampleWindow, TrendDirection};
use crate::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

struct MonitorState {
    windows: HashMap<String, SampleWindow>,
    threshold: f64,
}

/// Thread-safe owner of one `SampleWindow` per symbol
///
/// Every window call happens under the lock, including read-only trend
/// queries. Clones share the same state.
#[derive(Clone)]
pub struct TrendMonitor {
    state: Arc<RwLock<MonitorState>>,
    capacity: usize,
}

impl TrendMonitor {
    /// Create a new monitor
    ///
    /// # Arguments
    /// * `capacity` - Samples kept per symbol
    /// * `threshold` - Trend angle in degrees for every window
    pub fn new(capacity: usize, threshold: f64) -> std::result::Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::InvalidCapacity);
        }

        Ok(Self {
            state: Arc::new(RwLock::new(MonitorState {
                windows: HashMap::new(),
                threshold,
            })),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Feed a snapshot into its symbol's window, creating the window on first sight
    pub fn record(&self, snapshot: &PriceSnapshot) -> Result<()> {
        if !snapshot.price.is_finite() {
            return Err(format!(
                "Rejected non-finite price {} for {}",
                snapshot.price, snapshot.token
            )
            .into());
        }

        let mut state = self.state.write().map_err(|e| e.to_string())?;
        let threshold = state.threshold;

        let window = match state.windows.entry(snapshot.token.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!(token = %snapshot.token, capacity = self.capacity, "Tracking new symbol");
                entry.insert(SampleWindow::new(self.capacity, threshold)?)
            }
        };
        window.add(snapshot.price);

        tracing::debug!(
            token = %snapshot.token,
            price = %snapshot.price,
            samples = window.len(),
            "Recorded sample"
        );

        Ok(())
    }

    /// Build a report for a symbol, `None` if it was never recorded
    pub fn report(&self, token: &str) -> Result<Option<TrendReport>> {
        let state = self.state.read().map_err(|e| e.to_string())?;
        Ok(state.windows.get(token).map(|w| build_report(token, w)))
    }

    /// Reports for every tracked symbol, sorted by symbol
    pub fn reports(&self) -> Result<Vec<TrendReport>> {
        let state = self.state.read().map_err(|e| e.to_string())?;
        let mut reports: Vec<TrendReport> = state
            .windows
            .iter()
            .map(|(token, w)| build_report(token, w))
            .collect();
        reports.sort_by(|a, b| a.token.cmp(&b.token));
        Ok(reports)
    }

    /// Run `f` against a symbol's window while holding the read lock
    pub fn with_window<T>(&self, token: &str, f: impl FnOnce(&SampleWindow) -> T) -> Result<Option<T>> {
        let state = self.state.read().map_err(|e| e.to_string())?;
        Ok(state.windows.get(token).map(f))
    }

    /// Retained samples for a symbol, oldest first
    pub fn elements(&self, token: &str) -> Result<Vec<f64>> {
        Ok(self
            .with_window(token, |w| w.get_elements())?
            .unwrap_or_default())
    }

    pub fn sample_count(&self, token: &str) -> Result<usize> {
        Ok(self.with_window(token, |w| w.len())?.unwrap_or(0))
    }

    /// Get all tracked symbols
    pub fn symbols(&self) -> Result<Vec<String>> {
        let state = self.state.read().map_err(|e| e.to_string())?;
        let mut symbols: Vec<String> = state.windows.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    pub fn threshold(&self) -> Result<f64> {
        let state = self.state.read().map_err(|e| e.to_string())?;
        Ok(state.threshold)
    }

    /// Change the threshold of every current and future window
    pub fn set_threshold(&self, threshold: f64) -> Result<()> {
        let mut state = self.state.write().map_err(|e| e.to_string())?;
        state.threshold = threshold;
        for window in state.windows.values_mut() {
            window.set_threshold(threshold);
        }
        tracing::info!(threshold = %threshold, "Updated trend threshold");
        Ok(())
    }

    /// Drop a symbol's window
    pub fn clear_symbol(&self, token: &str) -> Result<()> {
        let mut state = self.state.write().map_err(|e| e.to_string())?;
        state.windows.remove(token);
        Ok(())
    }

    /// Drop every window
    pub fn clear_all(&self) -> Result<()> {
        let mut state = self.state.write().map_err(|e| e.to_string())?;
        state.windows.clear();
        Ok(())
    }
}

fn build_report(token: &str, window: &SampleWindow) -> TrendReport {
    let trend = window.get_trend();
    TrendReport {
        token: token.to_string(),
        samples: window.len(),
        full: window.is_full(),
        latest: window.latest(),
        sum: window.sum(),
        trend,
        threshold: window.threshold(),
        direction: TrendDirection::from_angle(trend.angle, window.threshold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(token: &str, price: f64) -> PriceSnapshot {
        PriceSnapshot {
            token: token.to_string(),
            price,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_new_monitor() {
        let monitor = TrendMonitor::new(10, 5.0).unwrap();
        assert_eq!(monitor.capacity(), 10);
        assert!(monitor.symbols().unwrap().is_empty());
        assert!(TrendMonitor::new(0, 5.0).is_err());
    }

    #[test]
    fn test_record_and_elements() {
        let monitor = TrendMonitor::new(3, 5.0).unwrap();
        for price in [100.0, 101.0, 102.0, 103.0] {
            monitor.record(&snapshot("SOL", price)).unwrap();
        }

        assert_eq!(monitor.elements("SOL").unwrap(), vec![101.0, 102.0, 103.0]);
        assert_eq!(monitor.sample_count("SOL").unwrap(), 3);
        assert_eq!(monitor.sample_count("JUP").unwrap(), 0);
    }

    #[test]
    fn test_rejects_non_finite_price() {
        let monitor = TrendMonitor::new(3, 5.0).unwrap();
        assert!(monitor.record(&snapshot("SOL", f64::NAN)).is_err());
        assert_eq!(monitor.sample_count("SOL").unwrap(), 0);
    }

    #[test]
    fn test_report() {
        let monitor = TrendMonitor::new(5, 5.0).unwrap();
        assert!(monitor.report("SOL").unwrap().is_none());

        for price in [100.0, 101.0, 102.0, 103.0, 104.0] {
            monitor.record(&snapshot("SOL", price)).unwrap();
        }

        let report = monitor.report("SOL").unwrap().unwrap();
        assert_eq!(report.samples, 5);
        assert!(report.full);
        assert_eq!(report.latest, Some(104.0));
        assert!((report.sum - 510.0).abs() < 1e-9);
        assert!((report.trend.slope - 1.0).abs() < 1e-9);
        assert_eq!(report.direction, Some(TrendDirection::Up));
    }

    #[test]
    fn test_multiple_symbols() {
        let monitor = TrendMonitor::new(5, 5.0).unwrap();
        monitor.record(&snapshot("SOL", 100.0)).unwrap();
        monitor.record(&snapshot("JUP", 1.0)).unwrap();
        monitor.record(&snapshot("BONK", 0.001)).unwrap();

        assert_eq!(monitor.symbols().unwrap(), vec!["BONK", "JUP", "SOL"]);
        let reports = monitor.reports().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].token, "BONK");
    }

    #[test]
    fn test_set_threshold_applies_to_all_windows() {
        let monitor = TrendMonitor::new(5, 5.0).unwrap();
        monitor.record(&snapshot("SOL", 100.0)).unwrap();
        monitor.set_threshold(50.0).unwrap();
        monitor.record(&snapshot("JUP", 1.0)).unwrap();

        assert_eq!(monitor.threshold().unwrap(), 50.0);
        assert_eq!(monitor.with_window("SOL", |w| w.threshold()).unwrap(), Some(50.0));
        assert_eq!(monitor.with_window("JUP", |w| w.threshold()).unwrap(), Some(50.0));
    }

    #[test]
    fn test_clear() {
        let monitor = TrendMonitor::new(5, 5.0).unwrap();
        monitor.record(&snapshot("SOL", 100.0)).unwrap();
        monitor.record(&snapshot("JUP", 1.0)).unwrap();

        monitor.clear_symbol("SOL").unwrap();
        assert_eq!(monitor.symbols().unwrap(), vec!["JUP"]);

        monitor.clear_all().unwrap();
        assert!(monitor.symbols().unwrap().is_empty());
    }

    #[test]
    fn test_thread_safety() {
        use std::thread;

        let monitor = TrendMonitor::new(100, 5.0).unwrap();
        let monitor_clone = monitor.clone();

        let handle = thread::spawn(move || {
            for i in 0..50 {
                monitor_clone
                    .record(&snapshot("SOL", 100.0 + i as f64))
                    .unwrap();
            }
        });

        for i in 50..150 {
            monitor.record(&snapshot("SOL", 100.0 + i as f64)).unwrap();
            let _ = monitor.report("SOL").unwrap();
        }

        handle.join().unwrap();

        assert_eq!(monitor.sample_count("SOL").unwrap(), 100);
        let elements = monitor.elements("SOL").unwrap();
        let expected: f64 = elements.iter().sum();
        let report = monitor.report("SOL").unwrap().unwrap();
        assert!((report.sum - expected).abs() < 1e-6);
    }
}
