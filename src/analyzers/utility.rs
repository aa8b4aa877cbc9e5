/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the sample (n-1) standard deviation given a pre-computed mean.
/// Returns `None` for fewer than two values.
pub fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Largest value, or `None` for empty input.
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Mean and sample standard deviation of a full trailing window.
///
/// Both are `None` when the window is shorter than `size` or holds a missing
/// value, so a row with an undefined baseline can never be compared.
pub fn window_stats(window: &[Option<f64>], size: usize) -> Option<(f64, f64)> {
    if size == 0 || window.len() < size {
        return None;
    }
    let values: Vec<f64> = window.iter().copied().collect::<Option<_>>()?;
    let avg = mean(&values);
    // a size-1 window has no spread
    let sd = sample_stddev(&values, avg)?;
    Some((avg, sd))
}

/// Trailing rolling mean over `values`. An entry is `None` until a full
/// window is available, and while the window holds an undefined point.
pub fn rolling_mean(values: &[Option<f64>], size: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if size == 0 || i + 1 < size {
                return None;
            }
            let window: Vec<f64> = values[i + 1 - size..=i]
                .iter()
                .copied()
                .collect::<Option<_>>()?;
            Some(mean(&window))
        })
        .collect()
}
