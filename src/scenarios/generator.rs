//! Named alternative trajectories derived from a base series.
//!
//! `optimistic` and `pessimistic` shift each point by an offset that ramps
//! linearly from zero at the first point to the full ramp amplitude at
//! the last point; `baseline` is the input unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClimError, ClimResult};
use crate::series::TimeSeriesPoint;

/// Default ramp amplitude reached at the last point.
pub const DEFAULT_RAMP: f64 = 0.5;

/// One of the known scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Input series unchanged.
    Baseline,
    /// Ramped decrease.
    Optimistic,
    /// Ramped increase.
    Pessimistic,
}

impl ScenarioKind {
    /// Every scenario in canonical order.
    pub const ALL: [Self; 3] = [Self::Baseline, Self::Optimistic, Self::Pessimistic];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Optimistic => "optimistic",
            Self::Pessimistic => "pessimistic",
        }
    }

    /// Sign of the ramp offset.
    const fn direction(self) -> f64 {
        match self {
            Self::Baseline => 0.0,
            Self::Optimistic => -1.0,
            Self::Pessimistic => 1.0,
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = ClimError;

    fn from_str(s: &str) -> ClimResult<Self> {
        match s {
            "baseline" => Ok(Self::Baseline),
            "optimistic" => Ok(Self::Optimistic),
            "pessimistic" => Ok(Self::Pessimistic),
            other => Err(ClimError::UnknownScenario {
                name: other.to_string(),
            }),
        }
    }
}

/// Which scenarios to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenarioSelection {
    /// All three scenarios.
    #[default]
    All,
    /// A single named scenario.
    Single(ScenarioKind),
}

impl FromStr for ScenarioSelection {
    type Err = ClimError;

    fn from_str(s: &str) -> ClimResult<Self> {
        if s == "all" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Single)
        }
    }
}

/// Scenario name to series mapping, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioSet {
    series: IndexMap<ScenarioKind, Vec<TimeSeriesPoint>>,
}

impl ScenarioSet {
    /// Series for `kind`, if generated.
    #[must_use]
    pub fn get(&self, kind: ScenarioKind) -> Option<&[TimeSeriesPoint]> {
        self.series.get(&kind).map(Vec::as_slice)
    }

    /// Number of scenarios in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Scenarios in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKind, &[TimeSeriesPoint])> {
        self.series.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Re-key by scenario name, keeping order.
    #[must_use]
    pub fn into_named(self) -> IndexMap<String, Vec<TimeSeriesPoint>> {
        self.series
            .into_iter()
            .map(|(k, v)| (k.as_str().to_string(), v))
            .collect()
    }
}

/// Derives scenario trajectories from a base series.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioGenerator {
    ramp: f64,
    default_series: Vec<TimeSeriesPoint>,
}

impl ScenarioGenerator {
    /// Create a generator.
    ///
    /// `default_series` substitutes for empty input.
    #[must_use]
    pub const fn new(ramp: f64, default_series: Vec<TimeSeriesPoint>) -> Self {
        Self {
            ramp,
            default_series,
        }
    }

    /// Ramp amplitude at the last point.
    #[must_use]
    pub const fn ramp(&self) -> f64 {
        self.ramp
    }

    /// Generate the selected scenarios from `series`.
    #[must_use]
    pub fn generate(&self, series: &[TimeSeriesPoint], selection: ScenarioSelection) -> ScenarioSet {
        let base = if series.is_empty() {
            tracing::info!("no series supplied, generating scenarios from default data");
            self.default_series.as_slice()
        } else {
            series
        };

        let series = match selection {
            ScenarioSelection::All => ScenarioKind::ALL
                .iter()
                .map(|&kind| (kind, self.apply(kind, base)))
                .collect(),
            ScenarioSelection::Single(kind) => {
                std::iter::once((kind, self.apply(kind, base))).collect()
            }
        };

        ScenarioSet { series }
    }

    /// Generate by name (`all`, `baseline`, `optimistic`, `pessimistic`).
    ///
    /// # Errors
    ///
    /// Returns [`ClimError::UnknownScenario`] for any other name.
    pub fn generate_named(&self, series: &[TimeSeriesPoint], name: &str) -> ClimResult<ScenarioSet> {
        Ok(self.generate(series, name.parse()?))
    }

    /// Apply one scenario's offset rule.
    ///
    /// The offset at index `i` of `n` points is `ramp * i / (n - 1)`, so
    /// the first point is untouched and the last moves by exactly `ramp`.
    #[must_use]
    pub fn apply(&self, kind: ScenarioKind, series: &[TimeSeriesPoint]) -> Vec<TimeSeriesPoint> {
        if kind == ScenarioKind::Baseline {
            return series.to_vec();
        }

        let steps = series.len().saturating_sub(1).max(1) as f64;
        let direction = kind.direction();

        series
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let offset = self.ramp * (i as f64 / steps);
                TimeSeriesPoint::new(p.year, p.value + direction * offset)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> ScenarioGenerator {
        ScenarioGenerator::new(
            DEFAULT_RAMP,
            vec![
                TimeSeriesPoint::new(2000, 14.8),
                TimeSeriesPoint::new(2030, 15.9),
            ],
        )
    }

    fn series() -> Vec<TimeSeriesPoint> {
        (0..5)
            .map(|i| TimeSeriesPoint::new(2020 + i * 10, 1.0 + f64::from(i) * 0.4))
            .collect()
    }

    #[test]
    fn test_all_scenarios_in_order() {
        let set = generator().generate(&series(), ScenarioSelection::All);
        let kinds: Vec<ScenarioKind> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, ScenarioKind::ALL.to_vec());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_baseline_unchanged() {
        let input = series();
        let set = generator().generate(&input, ScenarioSelection::All);
        assert_eq!(set.get(ScenarioKind::Baseline), Some(input.as_slice()));
    }

    #[test]
    fn test_ramp_endpoints() {
        let input = series();
        let set = generator().generate(&input, ScenarioSelection::All);
        let opt = set.get(ScenarioKind::Optimistic).unwrap();
        let pes = set.get(ScenarioKind::Pessimistic).unwrap();

        assert_eq!(opt[0].value, input[0].value);
        assert_eq!(pes[0].value, input[0].value);

        let last = input.len() - 1;
        assert!((opt[last].value - (input[last].value - 0.5)).abs() < 1e-12);
        assert!((pes[last].value - (input[last].value + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_ramp_is_linear() {
        let input = series();
        let opt = generator().apply(ScenarioKind::Optimistic, &input);
        // 5 points: offsets 0, 0.125, 0.25, 0.375, 0.5
        assert!((input[2].value - opt[2].value - 0.25).abs() < 1e-12);
        assert!(opt.iter().zip(&input).all(|(o, b)| o.year == b.year));
    }

    #[test]
    fn test_single_selection() {
        let set = generator()
            .generate_named(&series(), "pessimistic")
            .unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get(ScenarioKind::Pessimistic).is_some());
        assert!(set.get(ScenarioKind::Baseline).is_none());
    }

    #[test]
    fn test_unknown_scenario() {
        let err = generator().generate_named(&series(), "apocalyptic").unwrap_err();
        assert!(matches!(err, ClimError::UnknownScenario { name } if name == "apocalyptic"));
    }

    #[test]
    fn test_empty_input_uses_default() {
        let set = generator().generate(&[], ScenarioSelection::All);
        let baseline = set.get(ScenarioKind::Baseline).unwrap();
        assert_eq!(baseline.len(), 2);
        assert_eq!(baseline[0].year, 2000);
    }

    #[test]
    fn test_single_point_untouched() {
        let one = vec![TimeSeriesPoint::new(2020, 1.0)];
        let opt = generator().apply(ScenarioKind::Optimistic, &one);
        assert_eq!(opt, one);
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!("all".parse::<ScenarioSelection>().unwrap(), ScenarioSelection::All);
        assert_eq!(
            "optimistic".parse::<ScenarioSelection>().unwrap(),
            ScenarioSelection::Single(ScenarioKind::Optimistic)
        );
        assert!("ALL".parse::<ScenarioSelection>().is_err());
    }

    #[test]
    fn test_set_wire_shape() {
        let set = generator().generate(&series(), ScenarioSelection::All);
        let json = serde_json::to_value(&set).unwrap();
        assert!(json["baseline"].is_array());
        assert!(json["optimistic"][0]["temperature"].is_number());

        let named = set.into_named();
        assert_eq!(
            named.keys().cloned().collect::<Vec<_>>(),
            vec!["baseline", "optimistic", "pessimistic"]
        );
    }
}
