//! # climecon
//!
//! Climate-economic projection engine.
//!
//! Turns a short historical temperature/economic record into:
//! - A 30-year linear trend extension with derived economic impacts
//! - Monte Carlo risk metrics over Gaussian random-walk trajectories
//! - Baseline, optimistic and pessimistic scenarios, compared year by year
//! - Sensitivity coefficients that fall back softly on malformed input
//!
//! Every operation is a pure function of its inputs plus an injected
//! random source; nothing is shared between calls.
//!
//! ## Example
//!
//! ```rust
//! use climecon::prelude::*;
//!
//! let config = EngineConfig::builder().seed(42).paths(100).build().unwrap();
//! let mut rng = SimRng::new(42);
//! let result = config
//!     .pipeline()
//!     .project_with(&HistoricalData::default(), &mut rng)
//!     .unwrap();
//! assert_eq!(result.temperature_data.len(), 34);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Plain arithmetic reads closer to the formulas
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
)]

pub mod cli;
pub mod config;
pub mod domains;
pub mod engine;
pub mod error;
pub mod report;
pub mod scenarios;
pub mod series;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{EngineConfig, EngineConfigBuilder};
    pub use crate::domains::{
        EconomicImpactModel, RiskAggregator, RiskMetrics, SensitivityAnalyzer,
        SensitivityOutcome, SensitivityResult, StochasticPathSimulator, TrendModel,
    };
    pub use crate::engine::{
        ProjectionPipeline, ProjectionResult, RandomSource, SimRng, ThreadRandom,
    };
    pub use crate::error::{ClimError, ClimResult};
    pub use crate::report::{AnalysisReport, ExportFormat};
    pub use crate::scenarios::{
        ComparisonRow, ScenarioComparator, ScenarioGenerator, ScenarioKind, ScenarioSelection,
        ScenarioSet,
    };
    pub use crate::series::{
        EconomicPoint, EconomicRecord, EconomicValue, HistoricalData, HistoricalInput,
        TimeSeriesPoint,
    };
}

/// Re-export for public API
pub use error::{ClimError, ClimResult};
