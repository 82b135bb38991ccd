//! Year-indexed comparison table across named scenarios.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ClimError, ClimResult};
use crate::series::TimeSeriesPoint;

use super::generator::ScenarioSet;

/// One year of the comparison table: `{year, <scenario>: value, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Calendar year.
    pub year: i32,
    /// Scenario values keyed by scenario name, in scenario order.
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

impl ComparisonRow {
    /// Value of the named scenario in this row.
    #[must_use]
    pub fn value(&self, scenario: &str) -> Option<f64> {
        self.values.get(scenario).copied()
    }
}

/// Reshapes named scenario series into one row per year.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioComparator;

impl ScenarioComparator {
    /// Build the comparison table.
    ///
    /// Row order follows the years of the first scenario. Every other
    /// scenario is matched by year, not by position.
    ///
    /// # Errors
    ///
    /// - [`ClimError::EmptyScenarioSet`] if there are no scenarios or any
    ///   scenario series is empty.
    /// - [`ClimError::MissingYear`] if a scenario lacks a year present in
    ///   the first scenario.
    pub fn compare(
        &self,
        scenarios: &IndexMap<String, Vec<TimeSeriesPoint>>,
    ) -> ClimResult<Vec<ComparisonRow>> {
        let Some((_, reference)) = scenarios.first() else {
            return Err(ClimError::EmptyScenarioSet("no scenarios supplied".to_string()));
        };

        if let Some((name, _)) = scenarios.iter().find(|(_, s)| s.is_empty()) {
            return Err(ClimError::EmptyScenarioSet(format!(
                "scenario '{name}' has no points"
            )));
        }

        // First point wins if a scenario repeats a year
        let lookups: Vec<(&str, HashMap<i32, f64>)> = scenarios
            .iter()
            .map(|(name, series)| {
                let mut by_year = HashMap::with_capacity(series.len());
                for p in series {
                    by_year.entry(p.year).or_insert(p.value);
                }
                (name.as_str(), by_year)
            })
            .collect();

        reference
            .iter()
            .map(|point| {
                let values = lookups
                    .iter()
                    .map(|(name, by_year)| {
                        by_year
                            .get(&point.year)
                            .map(|&v| ((*name).to_string(), v))
                            .ok_or_else(|| ClimError::MissingYear {
                                scenario: (*name).to_string(),
                                year: point.year,
                            })
                    })
                    .collect::<ClimResult<IndexMap<String, f64>>>()?;
                Ok(ComparisonRow {
                    year: point.year,
                    values,
                })
            })
            .collect()
    }

    /// [`compare`](Self::compare) over a generated [`ScenarioSet`].
    ///
    /// # Errors
    ///
    /// Same as [`compare`](Self::compare).
    pub fn compare_set(&self, set: ScenarioSet) -> ClimResult<Vec<ComparisonRow>> {
        self.compare(&set.into_named())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::generator::{ScenarioGenerator, ScenarioSelection};

    fn s(points: &[(i32, f64)]) -> Vec<TimeSeriesPoint> {
        points
            .iter()
            .map(|&(y, v)| TimeSeriesPoint::new(y, v))
            .collect()
    }

    #[test]
    fn test_rows_per_year() {
        let mut scenarios = IndexMap::new();
        scenarios.insert("baseline".to_string(), s(&[(2020, 1.0), (2030, 2.0)]));
        scenarios.insert("optimistic".to_string(), s(&[(2020, 1.0), (2030, 1.5)]));

        let rows = ScenarioComparator.compare(&scenarios).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].year, 2030);
        assert_eq!(rows[1].value("baseline"), Some(2.0));
        assert_eq!(rows[1].value("optimistic"), Some(1.5));
    }

    #[test]
    fn test_matches_by_year_not_position() {
        let mut scenarios = IndexMap::new();
        scenarios.insert("a".to_string(), s(&[(2020, 1.0), (2030, 2.0)]));
        scenarios.insert("b".to_string(), s(&[(2030, 20.0), (2020, 10.0)]));

        let rows = ScenarioComparator.compare(&scenarios).unwrap();
        assert_eq!(rows[0].value("b"), Some(10.0));
        assert_eq!(rows[1].value("b"), Some(20.0));
    }

    #[test]
    fn test_missing_year() {
        let mut scenarios = IndexMap::new();
        scenarios.insert("baseline".to_string(), s(&[(2020, 1.0), (2030, 2.0)]));
        scenarios.insert("optimistic".to_string(), s(&[(2020, 1.0)]));

        let err = ScenarioComparator.compare(&scenarios).unwrap_err();
        assert!(matches!(
            err,
            ClimError::MissingYear { ref scenario, year: 2030 } if scenario == "optimistic"
        ));
    }

    #[test]
    fn test_extra_years_in_later_scenarios_ignored() {
        let mut scenarios = IndexMap::new();
        scenarios.insert("a".to_string(), s(&[(2020, 1.0)]));
        scenarios.insert("b".to_string(), s(&[(2020, 1.0), (2030, 9.0)]));

        let rows = ScenarioComparator.compare(&scenarios).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_empty_set() {
        let scenarios = IndexMap::new();
        assert!(matches!(
            ScenarioComparator.compare(&scenarios),
            Err(ClimError::EmptyScenarioSet(_))
        ));
    }

    #[test]
    fn test_empty_member_series() {
        let mut scenarios = IndexMap::new();
        scenarios.insert("baseline".to_string(), s(&[(2020, 1.0)]));
        scenarios.insert("pessimistic".to_string(), Vec::new());

        let err = ScenarioComparator.compare(&scenarios).unwrap_err();
        assert!(err.to_string().contains("pessimistic"));
    }

    #[test]
    fn test_row_wire_shape() {
        let mut values = IndexMap::new();
        values.insert("baseline".to_string(), 1.0);
        let row = ComparisonRow { year: 2020, values };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"year":2020,"baseline":1.0}"#);
    }

    #[test]
    fn test_compare_generated_set() {
        let generator = ScenarioGenerator::new(0.5, Vec::new());
        let set = generator.generate(&s(&[(2020, 1.0), (2030, 2.0)]), ScenarioSelection::All);
        let rows = ScenarioComparator.compare_set(set).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].values.keys().cloned().collect::<Vec<_>>(),
            vec!["baseline", "optimistic", "pessimistic"]
        );
        assert_eq!(rows[1].value("pessimistic"), Some(2.5));
    }
}
