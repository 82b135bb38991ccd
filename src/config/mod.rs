//! Engine configuration with YAML schema and validation.
//!
//! Configuration is checked in two passes:
//! - Schema constraints via `validator` derive attributes
//! - Semantic checks that need more than one field (finite parameters,
//!   a fallback dataset the trend model can actually fit)
//!
//! The fallback dataset lives here as an ordinary value and is handed to
//! the components that need it; nothing reads it from global state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::domains::economics::{EconomicImpactModel, DEFAULT_IMPACT_COEFFICIENT};
use crate::domains::monte_carlo::{StochasticPathSimulator, DEFAULT_HORIZON_YEARS};
use crate::domains::sensitivity::{SensitivityAnalyzer, SensitivityWeights, DEFAULT_FALLBACK_VALUE};
use crate::domains::trend::TrendModel;
use crate::engine::pipeline::{ProjectionPipeline, DEFAULT_PATHS, DEFAULT_VOLATILITY};
use crate::error::{ClimError, ClimResult};
use crate::scenarios::generator::{ScenarioGenerator, DEFAULT_RAMP};
use crate::series::{EconomicPoint, HistoricalData, TimeSeriesPoint};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Master seed. `None` draws from OS entropy on every run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Trend extension and simulation settings.
    #[validate(nested)]
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Scenario generation settings.
    #[validate(nested)]
    #[serde(default)]
    pub scenarios: ScenarioConfig,

    /// Sensitivity analysis settings.
    #[validate(nested)]
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Historical data substituted when a caller supplies none.
    #[serde(default = "default_dataset")]
    pub defaults: HistoricalData,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

/// Built-in fallback dataset: four observations spanning 2000-2030.
#[must_use]
pub fn default_dataset() -> HistoricalData {
    HistoricalData::new(
        vec![
            TimeSeriesPoint::new(2000, 14.8),
            TimeSeriesPoint::new(2010, 15.2),
            TimeSeriesPoint::new(2020, 15.5),
            TimeSeriesPoint::new(2030, 15.9),
        ],
        vec![
            EconomicPoint::level(2000, 33.6),
            EconomicPoint::level(2010, 65.9),
            EconomicPoint::level(2020, 84.5),
            EconomicPoint::level(2030, 100.0),
        ],
    )
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: None,
            projection: ProjectionConfig::default(),
            scenarios: ScenarioConfig::default(),
            sensitivity: SensitivityConfig::default(),
            defaults: default_dataset(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> ClimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> ClimResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check(&self) -> ClimResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    fn validate_semantic(&self) -> ClimResult<()> {
        let p = &self.projection;
        if !p.volatility.is_finite() {
            return Err(ClimError::config("projection.volatility must be finite"));
        }
        if !p.impact_coefficient.is_finite() {
            return Err(ClimError::config("projection.impact_coefficient must be finite"));
        }
        if !self.sensitivity.fallback_value.is_finite() || self.sensitivity.fallback_value < 0.0 {
            return Err(ClimError::config(
                "sensitivity.fallback_value must be finite and non-negative",
            ));
        }

        TrendModel::fit(&self.defaults.temperature)
            .map_err(|e| ClimError::config(format!("defaults.temperatureData unusable: {e}")))?;

        Ok(())
    }

    /// Path simulator for these settings.
    #[must_use]
    pub const fn simulator(&self) -> StochasticPathSimulator {
        StochasticPathSimulator::new(self.projection.horizon_years)
            .with_workers(self.projection.workers)
    }

    /// Impact model for these settings.
    #[must_use]
    pub const fn impact_model(&self) -> EconomicImpactModel {
        EconomicImpactModel::new(self.projection.impact_coefficient)
    }

    /// Projection pipeline for these settings.
    #[must_use]
    pub fn pipeline(&self) -> ProjectionPipeline {
        ProjectionPipeline::new(
            self.simulator(),
            self.impact_model(),
            self.projection.paths,
            self.projection.volatility,
            self.defaults.clone(),
        )
    }

    /// Scenario generator for these settings.
    #[must_use]
    pub fn scenario_generator(&self) -> ScenarioGenerator {
        ScenarioGenerator::new(self.scenarios.ramp, self.defaults.temperature.clone())
    }

    /// Sensitivity analyzer for these settings.
    #[must_use]
    pub const fn sensitivity_analyzer(&self) -> SensitivityAnalyzer {
        SensitivityAnalyzer::new(self.sensitivity.weights, self.sensitivity.fallback_value)
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    seed: Option<u64>,
    paths: Option<usize>,
    volatility: Option<f64>,
    horizon_years: Option<usize>,
    workers: Option<usize>,
    defaults: Option<HistoricalData>,
}

impl EngineConfigBuilder {
    /// Set the master seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of simulated trajectories.
    #[must_use]
    pub const fn paths(mut self, paths: usize) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Set the per-step volatility.
    #[must_use]
    pub const fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Set the projection horizon in years.
    #[must_use]
    pub const fn horizon_years(mut self, years: usize) -> Self {
        self.horizon_years = Some(years);
        self
    }

    /// Set the simulation worker count.
    #[must_use]
    pub const fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Replace the fallback dataset.
    #[must_use]
    pub fn defaults(mut self, defaults: HistoricalData) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`EngineConfig::check`].
    pub fn build(self) -> ClimResult<EngineConfig> {
        let mut config = EngineConfig {
            seed: self.seed,
            ..EngineConfig::default()
        };

        if let Some(paths) = self.paths {
            config.projection.paths = paths;
        }
        if let Some(volatility) = self.volatility {
            config.projection.volatility = volatility;
        }
        if let Some(years) = self.horizon_years {
            config.projection.horizon_years = years;
        }
        if let Some(workers) = self.workers {
            config.projection.workers = workers;
        }
        if let Some(defaults) = self.defaults {
            config.defaults = defaults;
        }

        config.check()?;
        Ok(config)
    }
}

/// Trend extension and simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Years projected beyond the last observation.
    #[validate(range(min = 1))]
    #[serde(default = "default_horizon")]
    pub horizon_years: usize,
    /// Number of simulated trajectories.
    #[validate(range(min = 1))]
    #[serde(default = "default_paths")]
    pub paths: usize,
    /// Per-step standard deviation of the random walk.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Economic impact per degree of deviation.
    #[serde(default = "default_impact_coefficient")]
    pub impact_coefficient: f64,
    /// Simulation threads (1 runs inline).
    #[validate(range(min = 1))]
    #[serde(default = "default_workers")]
    pub workers: usize,
}

const fn default_horizon() -> usize {
    DEFAULT_HORIZON_YEARS
}

const fn default_paths() -> usize {
    DEFAULT_PATHS
}

const fn default_volatility() -> f64 {
    DEFAULT_VOLATILITY
}

const fn default_impact_coefficient() -> f64 {
    DEFAULT_IMPACT_COEFFICIENT
}

const fn default_workers() -> usize {
    1
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon(),
            paths: default_paths(),
            volatility: default_volatility(),
            impact_coefficient: default_impact_coefficient(),
            workers: default_workers(),
        }
    }
}

/// Scenario generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Offset reached at the last point of optimistic/pessimistic series.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_ramp")]
    pub ramp: f64,
}

const fn default_ramp() -> f64 {
    DEFAULT_RAMP
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            ramp: default_ramp(),
        }
    }
}

/// Sensitivity analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SensitivityConfig {
    /// Category weight multipliers.
    #[validate(nested)]
    #[serde(default)]
    pub weights: SensitivityWeights,
    /// Value used for every category on fallback.
    #[serde(default = "default_fallback_value")]
    pub fallback_value: f64,
    /// Slider position used when building a full report.
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_sensitivity_value")]
    pub default_value: f64,
}

const fn default_fallback_value() -> f64 {
    DEFAULT_FALLBACK_VALUE
}

const fn default_sensitivity_value() -> f64 {
    50.0
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            weights: SensitivityWeights::default(),
            fallback_value: default_fallback_value(),
            default_value: default_sensitivity_value(),
        }
    }
}
