//! Rolling-window helpers shared by the indicators and the overlay builder.
//!
//! Series are index-aligned with the input: position `i` of the output
//! describes bar `i`, and `None` marks the warm-up region.

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Simple moving average over `period` values.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for (i, window) in values.windows(period).enumerate() {
        out[i + period - 1] = Some(mean(window));
    }
    out
}

/// Exponential moving average with smoothing `2 / (span + 1)`.
///
/// Seeded with the simple average of the first `span` values, so the first
/// defined point is at index `span - 1`.
pub fn ema(values: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if span == 0 || values.len() < span {
        return out;
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut current = mean(&values[..span]);
    out[span - 1] = Some(current);
    for (i, &x) in values.iter().enumerate().skip(span) {
        current = x * k + current * (1.0 - k);
        out[i] = Some(current);
    }
    out
}

/// EMA over the defined entries of a sparse series, re-aligned to the input.
pub fn ema_defined(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let (indices, defined): (Vec<usize>, Vec<f64>) = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .unzip();

    let mut out = vec![None; values.len()];
    for (i, smoothed) in indices.into_iter().zip(ema(&defined, span)) {
        out[i] = smoothed;
    }
    out
}

/// Last value and the one before it, when both are defined.
pub fn last_two(values: &[Option<f64>]) -> Option<(f64, f64)> {
    match values {
        [.., Some(previous), Some(current)] => Some((*previous, *current)),
        _ => None,
    }
}
