//! Risk summary statistics over simulated trajectories.

use serde::{Deserialize, Serialize};

use crate::error::{ClimError, ClimResult};

/// Percentile used for the `var95` statistic.
pub const VAR_PERCENTILE: f64 = 95.0;

/// Summary of the final-year outcomes of a simulation run.
///
/// `var95` is the 95th percentile of outcomes, not a tail-loss
/// Value-at-Risk in the financial sense; the name is kept for the
/// consumers that already read it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Arithmetic mean of final values.
    #[serde(rename = "mean_temperature")]
    pub mean: f64,
    /// 95th percentile of final values.
    #[serde(rename = "var_95")]
    pub var95: f64,
    /// Maximum final value.
    #[serde(rename = "max_temperature")]
    pub max: f64,
}

/// Reduces trajectories to [`RiskMetrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAggregator;

impl RiskAggregator {
    /// Aggregate the final value of every trajectory.
    ///
    /// # Errors
    ///
    /// - [`ClimError::EmptyInput`] if there are no trajectories, or any
    ///   trajectory is empty (no final value).
    /// - [`ClimError::NonFiniteValue`] if a final value is NaN or infinite.
    pub fn aggregate<T>(&self, trajectories: &[T]) -> ClimResult<RiskMetrics>
    where
        T: AsRef<[f64]>,
    {
        if trajectories.is_empty() {
            return Err(ClimError::EmptyInput(
                "cannot aggregate zero trajectories".to_string(),
            ));
        }

        let mut finals = Vec::with_capacity(trajectories.len());
        for (i, path) in trajectories.iter().enumerate() {
            let last = path
                .as_ref()
                .last()
                .copied()
                .ok_or_else(|| ClimError::EmptyInput(format!("trajectory {i} has no values")))?;
            if !last.is_finite() {
                return Err(ClimError::non_finite(format!("trajectory {i} final value")));
            }
            finals.push(last);
        }

        finals.sort_by(f64::total_cmp);

        let mean = finals.iter().sum::<f64>() / finals.len() as f64;
        let max = finals[finals.len() - 1];

        Ok(RiskMetrics {
            mean,
            var95: percentile_sorted(&finals, VAR_PERCENTILE),
            max,
        })
    }
}

/// Percentile of ascending-sorted data by linear interpolation between
/// the closest ranks (rank = p/100 * (n - 1)).
///
/// Returns NaN for empty input; `p` is clamped to `[0, 100]`.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_mean_and_var95_bounded_by_max(
            finals in prop::collection::vec(-1000.0f64..1000.0, 1..200),
        ) {
            let paths: Vec<Vec<f64>> = finals.iter().map(|&v| vec![0.0, v]).collect();
            let m = RiskAggregator.aggregate(&paths).unwrap();

            prop_assert!(m.mean <= m.max + 1e-9);
            prop_assert!(m.var95 <= m.max + 1e-9);
        }
    }
}
