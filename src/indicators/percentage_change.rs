/// Express `value` as a percentage of `reference`
///
/// A zero reference has no meaningful percentage, so it maps to 0.0 instead
/// of letting inf/NaN leak into the trend fit.
pub fn percent_of(value: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    value / reference * 100.0
}

/// Percentage change of a single sample against a window-wide reference
///
/// Used incrementally by `SampleWindow::add`, where `reference` is the
/// oldest sample still retained once the new value has been written.
pub fn window_relative_change(value: f64, reference: f64) -> f64 {
    percent_of(value, reference)
}

/// Recompute a percentage-change series from scratch over `values`
///
/// Every entry is normalized against `values[0]`, so the first entry of a
/// non-empty result is always 100.0 (or 0.0 for a zero base).
pub fn sub_window_relative_change(values: &[f64]) -> Vec<f64> {
    let Some(&base) = values.first() else {
        return Vec::new();
    };

    values.iter().map(|&v| percent_of(v, base)).collect()
}
