//! Scenario generation and comparison.

pub mod comparison;
pub mod generator;

pub use comparison::{ComparisonRow, ScenarioComparator};
pub use generator::{ScenarioGenerator, ScenarioKind, ScenarioSelection, ScenarioSet};
