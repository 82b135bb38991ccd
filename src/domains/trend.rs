//! Ordinary least-squares linear trend.
//!
//! Fits `value = slope * year + intercept` and extrapolates it to
//! arbitrary years. Prediction does no bounds checking: extrapolating
//! beyond the observed range is the point.

use serde::{Deserialize, Serialize};

use crate::error::{ClimError, ClimResult};
use crate::series::{ensure_finite, TimeSeriesPoint};

/// Fitted linear trend. Immutable after fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    slope: f64,
    intercept: f64,
    n_points: usize,
}

impl TrendModel {
    /// Fit a trend to the given points.
    ///
    /// # Errors
    ///
    /// - [`ClimError::InsufficientData`] if `points` is empty or every
    ///   point shares the same year (slope undefined).
    /// - [`ClimError::NonFiniteValue`] if any value is NaN or infinite.
    pub fn fit(points: &[TimeSeriesPoint]) -> ClimResult<Self> {
        if points.is_empty() {
            return Err(ClimError::insufficient_data("cannot fit a trend to zero points"));
        }
        ensure_finite(points, "trend input")?;

        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| f64::from(p.year)).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.value).sum::<f64>() / n;

        // Centered sums keep precision for calendar-year magnitudes
        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), p| {
            let dx = f64::from(p.year) - mean_x;
            (sxx + dx * dx, sxy + dx * (p.value - mean_y))
        });

        if sxx <= 0.0 {
            return Err(ClimError::insufficient_data(format!(
                "all {} points share year {}; slope is undefined",
                points.len(),
                points[0].year
            )));
        }

        let slope = sxy / sxx;
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
            n_points: points.len(),
        })
    }

    /// Evaluate the fitted line at `year`.
    #[must_use]
    pub fn predict(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }

    /// Fitted slope (value units per year).
    #[must_use]
    pub const fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted intercept (value at year 0).
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of points the model was fitted on.
    #[must_use]
    pub const fn n_points(&self) -> usize {
        self.n_points
    }

    /// Root-mean-square residual of the fit over `points`.
    #[must_use]
    pub fn rms_residual(&self, points: &[TimeSeriesPoint]) -> f64 {
        if points.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = points
            .iter()
            .map(|p| (p.value - self.predict(p.year)).powi(2))
            .sum();
        (sum_sq / points.len() as f64).sqrt()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Slope sign follows the sign of the generating trend.
        #[test]
        fn prop_slope_sign_matches_trend(
            slope in prop_oneof![-2.0f64..-0.01, 0.01f64..2.0],
            intercept in -50.0f64..50.0,
            n in 2usize..20,
        ) {
            let points: Vec<TimeSeriesPoint> = (0..n)
                .map(|i| {
                    let year = 1990 + i as i32 * 5;
                    TimeSeriesPoint::new(year, intercept + slope * f64::from(year - 1990))
                })
                .collect();
            let model = TrendModel::fit(&points).unwrap();

            prop_assert_eq!(model.slope().signum(), slope.signum());
        }

        /// Endpoint predictions stay within the fit residual envelope.
        #[test]
        fn prop_endpoints_within_residual(
            values in prop::collection::vec(-10.0f64..10.0, 2..15),
        ) {
            let points: Vec<TimeSeriesPoint> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| TimeSeriesPoint::new(2000 + i as i32, v))
                .collect();
            let model = TrendModel::fit(&points).unwrap();
            let rms = model.rms_residual(&points);
            let bound = rms * (points.len() as f64).sqrt() + 1e-9;

            for p in [points[0], points[points.len() - 1]] {
                prop_assert!((model.predict(p.year) - p.value).abs() <= bound);
            }
        }
    }
}
