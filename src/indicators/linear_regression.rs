/// Ordinary least-squares fit of `y = slope * x + intercept`
///
/// `x` is the position of each value in `series` (0..n-1).
///
/// Degenerate inputs return a defined line instead of dividing by zero:
/// - empty series: slope 0, intercept 0
/// - single value: slope 0, intercept = that value
pub fn fit_line(series: &[f64]) -> (f64, f64) {
    let n = series.len();
    match n {
        0 => return (0.0, 0.0),
        1 => return (0.0, series[0]),
        _ => {}
    }

    let n_f = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, &y) in series.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return (0.0, sum_y / n_f);
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;

    (slope, intercept)
}

/// Convert a slope to its angle in degrees: `atan(slope) * 180 / PI`
pub fn slope_to_angle(slope: f64) -> f64 {
    slope.atan().to_degrees()
}
