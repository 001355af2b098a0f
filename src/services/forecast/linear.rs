use super::{ForecastError, Forecaster, Projection};

/// Relative move against the fitted anchor that counts as directional.
pub const LINEAR_THRESHOLD: f64 = 0.01;

/// Ordinary least squares line through `(index, value)`.
///
/// The projection starts from the fitted value at the last index rather than
/// the last raw value, so the forecast continues the fitted line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearTrend;

/// `(intercept, slope)` of the OLS fit.
fn fit_line(series: &[f64]) -> Result<(f64, f64), ForecastError> {
    if series.len() < 2 {
        return Err(ForecastError::InsufficientData {
            required: 2,
            actual: series.len(),
        });
    }
    if series.iter().any(|y| !y.is_finite()) {
        return Err(ForecastError::NonFiniteInput);
    }

    let n = series.len() as f64;
    let sum_t: f64 = (0..series.len()).map(|i| i as f64).sum();
    let sum_t2: f64 = (0..series.len()).map(|i| (i * i) as f64).sum();
    let sum_y: f64 = series.iter().sum();
    let sum_ty: f64 = series.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();

    let denominator = n * sum_t2 - sum_t * sum_t;
    let slope = (n * sum_ty - sum_t * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_t) / n;
    Ok((intercept, slope))
}

impl Forecaster for LinearTrend {
    fn name(&self) -> String {
        "Linear regression".to_string()
    }

    fn threshold(&self) -> f64 {
        LINEAR_THRESHOLD
    }

    fn project(&self, series: &[f64], horizon: usize) -> Result<Projection, ForecastError> {
        let (intercept, slope) = fit_line(series)?;
        let anchor = intercept + slope * (series.len() - 1) as f64;

        let values: Vec<f64> = (1..=horizon).map(|k| anchor + slope * k as f64).collect();
        if !anchor.is_finite() || values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteOutput);
        }

        Ok(Projection {
            values,
            reference: anchor,
        })
    }
}
