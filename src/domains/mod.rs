//! Domain models.
//!
//! Building blocks of a projection:
//! - Trend: least-squares linear fit of temperature on year
//! - Monte Carlo: Gaussian random-walk trajectories
//! - Risk: final-year statistics over trajectories
//! - Economics: temperature deviation to economic impact
//! - Sensitivity: per-driver coefficients from an economic series

pub mod economics;
pub mod monte_carlo;
pub mod risk;
pub mod sensitivity;
pub mod trend;

pub use economics::EconomicImpactModel;
pub use monte_carlo::{StochasticPathSimulator, Trajectory};
pub use risk::{RiskAggregator, RiskMetrics};
pub use sensitivity::{
    SensitivityAnalyzer, SensitivityOutcome, SensitivityResult, SensitivityWeights,
};
pub use trend::TrendModel;
