//! Temperature-to-economy impact model.

use serde::{Deserialize, Serialize};

/// Default impact per degree of warming (1% of output lost per degree).
pub const DEFAULT_IMPACT_COEFFICIENT: f64 = -0.01;

/// Linear map from a temperature deviation to an economic impact delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicImpactModel {
    coefficient: f64,
}

impl Default for EconomicImpactModel {
    fn default() -> Self {
        Self::new(DEFAULT_IMPACT_COEFFICIENT)
    }
}

impl EconomicImpactModel {
    /// Create a model with a custom sensitivity coefficient.
    #[must_use]
    pub const fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }

    /// Impact coefficient per degree.
    #[must_use]
    pub const fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Impact of a temperature deviation.
    #[must_use]
    pub fn impact(&self, temperature_delta: f64) -> f64 {
        self.coefficient * temperature_delta
    }
}
