//! End-to-end projection: trend extension, impact derivation, risk.
//!
//! Each call fits a fresh [`TrendModel`] and draws fresh trajectories;
//! nothing is cached between calls, so one pipeline can be shared across
//! threads.

use serde::{Deserialize, Serialize};

use crate::domains::economics::EconomicImpactModel;
use crate::domains::monte_carlo::StochasticPathSimulator;
use crate::domains::risk::{RiskAggregator, RiskMetrics};
use crate::domains::trend::TrendModel;
use crate::engine::rng::{RandomSource, ThreadRandom};
use crate::error::{ClimError, ClimResult};
use crate::series::{latest, EconomicPoint, HistoricalData, TimeSeriesPoint};

/// Default number of simulated trajectories.
pub const DEFAULT_PATHS: usize = 1000;

/// Default per-step volatility of simulated trajectories.
pub const DEFAULT_VOLATILITY: f64 = 0.1;

/// Output of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Historical temperature points followed by the projected years.
    pub temperature_data: Vec<TimeSeriesPoint>,
    /// Historical economic points followed by derived impact deltas.
    pub economic_data: Vec<EconomicPoint>,
    /// Final-year statistics of the simulated trajectories.
    pub risk_metrics: RiskMetrics,
}

impl ProjectionResult {
    /// Projected (non-historical) temperature points.
    #[must_use]
    pub fn projected(&self, horizon_years: usize) -> &[TimeSeriesPoint] {
        let start = self.temperature_data.len().saturating_sub(horizon_years);
        &self.temperature_data[start..]
    }
}

/// Orchestrates trend fit, extrapolation, impact and risk aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPipeline {
    simulator: StochasticPathSimulator,
    impact_model: EconomicImpactModel,
    paths: usize,
    volatility: f64,
    defaults: HistoricalData,
}

impl Default for ProjectionPipeline {
    fn default() -> Self {
        Self::new(
            StochasticPathSimulator::default(),
            EconomicImpactModel::default(),
            DEFAULT_PATHS,
            DEFAULT_VOLATILITY,
            crate::config::default_dataset(),
        )
    }
}

impl ProjectionPipeline {
    /// Create a pipeline.
    ///
    /// `defaults` substitutes for historical data with no temperature
    /// points.
    #[must_use]
    pub const fn new(
        simulator: StochasticPathSimulator,
        impact_model: EconomicImpactModel,
        paths: usize,
        volatility: f64,
        defaults: HistoricalData,
    ) -> Self {
        Self {
            simulator,
            impact_model,
            paths,
            volatility,
            defaults,
        }
    }

    /// Years projected beyond the latest observation.
    #[must_use]
    pub const fn horizon_years(&self) -> usize {
        self.simulator.horizon_years()
    }

    /// Project with the thread-local, non-deterministic random source.
    ///
    /// # Errors
    ///
    /// See [`project_with`](Self::project_with).
    pub fn project(&self, historical: &HistoricalData) -> ClimResult<ProjectionResult> {
        self.project_with(historical, &mut ThreadRandom)
    }

    /// Project with an injected random source.
    ///
    /// # Errors
    ///
    /// - [`ClimError::InsufficientData`] if the temperature series cannot
    ///   be fitted (fewer than two distinct years).
    /// - [`ClimError::NonFiniteValue`] if any temperature is NaN or
    ///   infinite.
    /// - [`ClimError::Config`] if the projected years overflow the
    ///   calendar range or the simulator parameters are invalid.
    pub fn project_with<R>(
        &self,
        historical: &HistoricalData,
        rng: &mut R,
    ) -> ClimResult<ProjectionResult>
    where
        R: RandomSource + ?Sized,
    {
        let data = if historical.is_empty() {
            tracing::info!("no temperature series supplied, projecting from default data");
            &self.defaults
        } else {
            historical
        };

        let model = TrendModel::fit(&data.temperature)?;
        let last = latest(&data.temperature)
            .ok_or_else(|| ClimError::insufficient_data("temperature series is empty"))?;
        let base_temperature = last.value;
        tracing::debug!(
            slope = model.slope(),
            intercept = model.intercept(),
            last_year = last.year,
            base_temperature,
            "trend fitted"
        );

        let predictions = self.extrapolate(&model, last.year)?;

        let mut economic_data = data.economic.clone();
        economic_data.extend(predictions.iter().map(|p| {
            EconomicPoint::delta(p.year, self.impact_model.impact(p.value - base_temperature))
        }));

        let trajectories =
            self.simulator
                .simulate(self.paths, base_temperature, self.volatility, rng)?;
        let risk_metrics = RiskAggregator.aggregate(&trajectories)?;
        tracing::debug!(
            paths = trajectories.len(),
            mean = risk_metrics.mean,
            var95 = risk_metrics.var95,
            max = risk_metrics.max,
            "risk aggregated"
        );

        let mut temperature_data = data.temperature.clone();
        temperature_data.extend(predictions);

        Ok(ProjectionResult {
            temperature_data,
            economic_data,
            risk_metrics,
        })
    }

    /// Predict each of the `horizon` consecutive years after `last_year`.
    fn extrapolate(&self, model: &TrendModel, last_year: i32) -> ClimResult<Vec<TimeSeriesPoint>> {
        let horizon = i32::try_from(self.horizon_years())
            .map_err(|_| ClimError::config("projection horizon exceeds calendar range"))?;

        (1..=horizon)
            .map(|offset| {
                let year = last_year
                    .checked_add(offset)
                    .ok_or_else(|| ClimError::config("projected year exceeds calendar range"))?;
                Ok(TimeSeriesPoint::new(year, model.predict(year)))
            })
            .collect()
    }
}
