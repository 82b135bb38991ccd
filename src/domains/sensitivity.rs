//! Sensitivity coefficients for the interactive sensitivity slider.
//!
//! Given the latest economic value and a 0-100 slider position, produces
//! four named coefficients:
//!
//! ```text
//! factor = (sensitivity / 100) * 2
//! coefficient[c] = base * factor * weight[c]
//! ```
//!
//! This path is driven by live UI input and must stay available, so
//! [`SensitivityAnalyzer::analyze`] never fails: malformed input yields a
//! fixed fallback result, and the outcome type records why.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ClimError, ClimResult};
use crate::series::{EconomicPoint, EconomicRecord};

/// Coefficient value used for every category when analysis falls back.
pub const DEFAULT_FALLBACK_VALUE: f64 = 0.1;

/// Per-category weight multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SensitivityWeights {
    /// Temperature driver weight.
    #[validate(range(min = 0.0))]
    pub temperature: f64,
    /// Economic growth driver weight.
    #[validate(range(min = 0.0))]
    pub economic_growth: f64,
    /// Adaptation driver weight.
    #[validate(range(min = 0.0))]
    pub adaptation: f64,
    /// Technology driver weight.
    #[validate(range(min = 0.0))]
    pub technology: f64,
}

impl Default for SensitivityWeights {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            economic_growth: 0.8,
            adaptation: 1.2,
            technology: 1.5,
        }
    }
}

/// The four sensitivity coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    /// Response to the temperature driver.
    pub temperature_sensitivity: f64,
    /// Response to the economic growth driver.
    pub economic_growth_sensitivity: f64,
    /// Response to the adaptation driver.
    pub adaptation_sensitivity: f64,
    /// Response to the technology driver.
    pub technology_sensitivity: f64,
}

impl SensitivityResult {
    /// Result with every category set to `value`.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            temperature_sensitivity: value,
            economic_growth_sensitivity: value,
            adaptation_sensitivity: value,
            technology_sensitivity: value,
        }
    }

    /// Category names paired with their coefficients, in fixed order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("temperature_sensitivity", self.temperature_sensitivity),
            ("economic_growth_sensitivity", self.economic_growth_sensitivity),
            ("adaptation_sensitivity", self.adaptation_sensitivity),
            ("technology_sensitivity", self.technology_sensitivity),
        ]
    }

    /// Whether every coefficient is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.entries().iter().all(|(_, v)| v.is_finite())
    }
}

/// Outcome of a soft-failing analysis.
#[derive(Debug)]
pub enum SensitivityOutcome {
    /// Coefficients computed from the input.
    Computed(SensitivityResult),
    /// Input was unusable; the fixed fallback was substituted.
    Fallback {
        /// The fallback coefficients.
        result: SensitivityResult,
        /// Why the input was rejected.
        reason: ClimError,
    },
}

impl SensitivityOutcome {
    /// The coefficients, computed or fallback.
    #[must_use]
    pub const fn result(&self) -> &SensitivityResult {
        match self {
            Self::Computed(result) | Self::Fallback { result, .. } => result,
        }
    }

    /// Consume the outcome, keeping only the coefficients.
    #[must_use]
    pub fn into_result(self) -> SensitivityResult {
        match self {
            Self::Computed(result) | Self::Fallback { result, .. } => result,
        }
    }

    /// Whether the fallback was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Reason for the fallback, if any.
    #[must_use]
    pub const fn fallback_reason(&self) -> Option<&ClimError> {
        match self {
            Self::Computed(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Computes sensitivity coefficients from an economic series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityAnalyzer {
    weights: SensitivityWeights,
    fallback_value: f64,
}

impl Default for SensitivityAnalyzer {
    fn default() -> Self {
        Self::new(SensitivityWeights::default(), DEFAULT_FALLBACK_VALUE)
    }
}

impl SensitivityAnalyzer {
    /// Create an analyzer with explicit weights and fallback value.
    #[must_use]
    pub const fn new(weights: SensitivityWeights, fallback_value: f64) -> Self {
        Self {
            weights,
            fallback_value,
        }
    }

    /// Configured weights.
    #[must_use]
    pub const fn weights(&self) -> &SensitivityWeights {
        &self.weights
    }

    /// The fixed fallback result.
    #[must_use]
    pub const fn fallback(&self) -> SensitivityResult {
        SensitivityResult::uniform(self.fallback_value)
    }

    /// Strict analysis: malformed input is returned as an error.
    ///
    /// The base value is read from the latest record (maximum year; records
    /// without a year rank below dated ones), preferring `gdp` over
    /// `impact` when both are present.
    ///
    /// # Errors
    ///
    /// - [`ClimError::InvalidSensitivity`] if `sensitivity` is outside
    ///   `[0, 100]` or not finite.
    /// - [`ClimError::MalformedEconomicData`] if the series is empty, the
    ///   latest record has no usable value, or that value is not finite.
    pub fn try_analyze(
        &self,
        records: &[EconomicRecord],
        sensitivity: f64,
    ) -> ClimResult<SensitivityResult> {
        if !(0.0..=100.0).contains(&sensitivity) {
            return Err(ClimError::InvalidSensitivity { value: sensitivity });
        }

        let latest = records
            .iter()
            .max_by_key(|r| r.year)
            .ok_or_else(|| ClimError::malformed("economic series is empty"))?;

        let base = latest
            .value()
            .ok_or_else(|| ClimError::malformed("latest record has neither 'gdp' nor 'impact'"))?
            .amount();
        if !base.is_finite() {
            return Err(ClimError::malformed("latest economic value is not finite"));
        }

        let factor = (sensitivity / 100.0) * 2.0;
        let w = &self.weights;
        Ok(SensitivityResult {
            temperature_sensitivity: base * factor * w.temperature,
            economic_growth_sensitivity: base * factor * w.economic_growth,
            adaptation_sensitivity: base * factor * w.adaptation,
            technology_sensitivity: base * factor * w.technology,
        })
    }

    /// Soft-failing analysis: malformed input yields the fallback result.
    ///
    /// The rejection is logged at `warn` and kept in the outcome; it is
    /// never surfaced as an error.
    #[must_use]
    pub fn analyze(&self, records: &[EconomicRecord], sensitivity: f64) -> SensitivityOutcome {
        match self.try_analyze(records, sensitivity) {
            Ok(result) => SensitivityOutcome::Computed(result),
            Err(reason) => {
                tracing::warn!(
                    sensitivity,
                    records = records.len(),
                    error = %reason,
                    "sensitivity analysis fell back to defaults"
                );
                SensitivityOutcome::Fallback {
                    result: self.fallback(),
                    reason,
                }
            }
        }
    }

    /// [`analyze`](Self::analyze) over typed economic points.
    #[must_use]
    pub fn analyze_points(&self, points: &[EconomicPoint], sensitivity: f64) -> SensitivityOutcome {
        let records: Vec<EconomicRecord> = points.iter().copied().map(EconomicRecord::from).collect();
        self.analyze(&records, sensitivity)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_finite_and_non_negative(base in 0.0f64..1e6, sensitivity in 0.0f64..=100.0) {
            let records = vec![EconomicRecord {
                year: Some(2030),
                gdp: Some(base),
                ..Default::default()
            }];
            let outcome = SensitivityAnalyzer::default().analyze(&records, sensitivity);

            prop_assert!(!outcome.is_fallback());
            prop_assert!(outcome.result().is_finite());
            prop_assert!(outcome.result().entries().iter().all(|(_, v)| *v >= 0.0));
        }
    }
}
