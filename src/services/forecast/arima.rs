//! ARIMA(p, d, q) forecaster.
//!
//! AR coefficients come from the Yule-Walker equations solved with the
//! Levinson-Durbin recursion on the mean-centred differenced series. MA
//! coefficients are estimated from the autocorrelation of the AR residuals.

use super::{ArimaOrder, ForecastError, Forecaster, Projection};

const MAX_P: usize = 10;
const MAX_D: usize = 2;
const MAX_Q: usize = 10;
const EPSILON: f64 = 1e-10;

/// Relative move against the last close that counts as directional.
pub const ARIMA_THRESHOLD: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arima {
    order: ArimaOrder,
}

/// Coefficients and state needed to extend a fitted series.
#[derive(Debug, Clone)]
struct FittedArima {
    ar: Vec<f64>,
    ma: Vec<f64>,
    mean: f64,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    /// Last value at each differencing level, outermost first.
    anchors: Vec<f64>,
}

impl Arima {
    pub fn new(order: ArimaOrder) -> Self {
        Self { order }
    }

    fn validate(&self) -> Result<(), ForecastError> {
        let ArimaOrder { p, d, q } = self.order;
        if p > MAX_P {
            return Err(ForecastError::InvalidParameter {
                name: "p",
                reason: format!("AR order must be <= {}", MAX_P),
            });
        }
        if d > MAX_D {
            return Err(ForecastError::InvalidParameter {
                name: "d",
                reason: format!("Differencing order must be <= {}", MAX_D),
            });
        }
        if q > MAX_Q {
            return Err(ForecastError::InvalidParameter {
                name: "q",
                reason: format!("MA order must be <= {}", MAX_Q),
            });
        }
        Ok(())
    }

    fn fit(&self, series: &[f64]) -> Result<FittedArima, ForecastError> {
        self.validate()?;

        let required = self.order.min_observations();
        if series.len() < required {
            return Err(ForecastError::InsufficientData {
                required,
                actual: series.len(),
            });
        }
        if series.iter().any(|x| !x.is_finite()) {
            return Err(ForecastError::NonFiniteInput);
        }

        let mut anchors = Vec::with_capacity(self.order.d);
        let mut differenced = series.to_vec();
        for _ in 0..self.order.d {
            if let Some(&last) = differenced.last() {
                anchors.push(last);
            }
            differenced = difference(&differenced);
        }

        let n = differenced.len();
        let mean = differenced.iter().sum::<f64>() / n as f64;
        let centered: Vec<f64> = differenced.iter().map(|x| x - mean).collect();

        let acov = autocovariance(&centered, self.order.p);
        let ar = levinson_durbin(&acov, self.order.p)?;

        let mut residuals = vec![0.0; n];
        for i in self.order.p..n {
            let fitted: f64 = ar
                .iter()
                .enumerate()
                .map(|(j, phi)| phi * centered[i - j - 1])
                .sum();
            residuals[i] = centered[i] - fitted;
        }

        let ma = ma_coefficients(&residuals, self.order.q);

        Ok(FittedArima {
            ar,
            ma,
            mean,
            differenced,
            residuals,
            anchors,
        })
    }
}

impl FittedArima {
    fn forecast(&self, steps: usize) -> Vec<f64> {
        let n = self.differenced.len();
        let mut extended = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..steps {
            let mut next = self.mean;
            for (j, phi) in self.ar.iter().enumerate() {
                next += phi * (extended[extended.len() - j - 1] - self.mean);
            }
            for (j, theta) in self.ma.iter().enumerate() {
                if let Some(e) = shocks.len().checked_sub(j + 1).map(|idx| shocks[idx]) {
                    next += theta * e;
                }
            }
            extended.push(next);
            shocks.push(0.0);
        }

        let mut path = extended[n..].to_vec();
        for &anchor in self.anchors.iter().rev() {
            path = integrate(anchor, &path);
        }
        path
    }
}

impl Forecaster for Arima {
    fn name(&self) -> String {
        self.order.to_string()
    }

    fn threshold(&self) -> f64 {
        ARIMA_THRESHOLD
    }

    fn project(&self, series: &[f64], horizon: usize) -> Result<Projection, ForecastError> {
        let fitted = self.fit(series)?;
        let values = fitted.forecast(horizon);
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteOutput);
        }

        let reference = series
            .last()
            .copied()
            .ok_or(ForecastError::InsufficientData {
                required: 1,
                actual: 0,
            })?;

        Ok(Projection { values, reference })
    }
}

fn difference(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Cumulative sum starting from `anchor`.
fn integrate(anchor: f64, steps: &[f64]) -> Vec<f64> {
    steps
        .iter()
        .scan(anchor, |level, step| {
            *level += step;
            Some(*level)
        })
        .collect()
}

/// Biased sample autocovariance for lags `0..=max_lag` of a centred series.
fn autocovariance(centered: &[f64], max_lag: usize) -> Vec<f64> {
    let n = centered.len() as f64;
    (0..=max_lag)
        .map(|k| {
            centered
                .iter()
                .skip(k)
                .zip(centered)
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n
        })
        .collect()
}

/// Solve the Yule-Walker equations for `p` AR coefficients.
///
/// A reflection coefficient with magnitude at or above one means the implied
/// process is not stationary and the fit is rejected. A zero-variance series
/// yields all-zero coefficients.
fn levinson_durbin(acov: &[f64], p: usize) -> Result<Vec<f64>, ForecastError> {
    let mut phi = vec![0.0; p];
    if p == 0 || acov[0].abs() < EPSILON {
        return Ok(phi);
    }

    let mut error = acov[0];
    for k in 0..p {
        if error.abs() < EPSILON * acov[0] {
            break;
        }

        let mut acc = acov[k + 1];
        for j in 0..k {
            acc -= phi[j] * acov[k - j];
        }
        let reflection = acc / error;
        if !reflection.is_finite() || reflection.abs() >= 1.0 {
            return Err(ForecastError::NonStationary {
                lag: k + 1,
                reflection,
            });
        }

        let previous = phi.clone();
        phi[k] = reflection;
        for j in 0..k {
            phi[j] = previous[j] - reflection * previous[k - 1 - j];
        }
        error *= 1.0 - reflection * reflection;
    }

    Ok(phi)
}

fn ma_coefficients(residuals: &[f64], q: usize) -> Vec<f64> {
    let mut theta = vec![0.0; q];
    if q == 0 || residuals.is_empty() {
        return theta;
    }

    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let centered: Vec<f64> = residuals.iter().map(|e| e - mean).collect();
    let acov = autocovariance(&centered, q);
    if acov[0].abs() < EPSILON {
        return theta;
    }

    for (k, coeff) in theta.iter_mut().enumerate() {
        *coeff = (acov[k + 1] / acov[0]).clamp(-0.99, 0.99);
    }
    theta
}
