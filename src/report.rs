//! Full analysis bundle and structural export.
//!
//! The report is the read-only structure downstream summary layers
//! consume: `{temperatureData, economicData, riskMetrics, scenarioData,
//! sensitivityData}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::EngineConfig;
use crate::domains::risk::RiskMetrics;
use crate::domains::sensitivity::SensitivityResult;
use crate::engine::rng::RandomSource;
use crate::error::{ClimError, ClimResult};
use crate::scenarios::comparison::ComparisonRow;
use crate::scenarios::generator::{ScenarioSelection, ScenarioSet};
use crate::series::{EconomicPoint, HistoricalData, HistoricalInput, TimeSeriesPoint};

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Historical plus projected temperatures.
    pub temperature_data: Vec<TimeSeriesPoint>,
    /// Historical levels plus projected impact deltas.
    pub economic_data: Vec<EconomicPoint>,
    /// Final-year trajectory statistics.
    pub risk_metrics: RiskMetrics,
    /// All scenarios derived from the projected temperature series.
    pub scenario_data: ScenarioSet,
    /// Sensitivity coefficients at the configured slider value.
    pub sensitivity_data: SensitivityResult,
}

impl AnalysisReport {
    /// Run projection, scenario generation and sensitivity analysis.
    ///
    /// Scenarios are derived from the full projected temperature series.
    /// Sensitivity runs on the historical economic series (after default
    /// substitution) and soft-fails to the configured fallback.
    ///
    /// # Errors
    ///
    /// Propagates projection errors; sensitivity never fails.
    pub fn build<R>(
        config: &EngineConfig,
        historical: &HistoricalData,
        rng: &mut R,
    ) -> ClimResult<Self>
    where
        R: RandomSource + ?Sized,
    {
        Self::build_from_input(config, &HistoricalInput::from(historical.clone()), rng)
    }

    /// [`build`](Self::build) over raw file input.
    ///
    /// The projection sees only the economic rows that convert to typed
    /// points. Sensitivity sees every raw row, so sector-only or mistyped
    /// rows fall back instead of failing the report.
    ///
    /// # Errors
    ///
    /// Propagates projection errors; sensitivity never fails.
    pub fn build_from_input<R>(
        config: &EngineConfig,
        input: &HistoricalInput,
        rng: &mut R,
    ) -> ClimResult<Self>
    where
        R: RandomSource + ?Sized,
    {
        let projection = config
            .pipeline()
            .project_with(&input.to_historical(), rng)?;

        let scenario_data = config
            .scenario_generator()
            .generate(&projection.temperature_data, ScenarioSelection::All);

        let analyzer = config.sensitivity_analyzer();
        let value = config.sensitivity.default_value;
        let sensitivity_data = if input.is_empty() {
            analyzer.analyze_points(&config.defaults.economic, value)
        } else {
            analyzer.analyze(&input.economic, value)
        }
        .into_result();

        Ok(Self {
            temperature_data: projection.temperature_data,
            economic_data: projection.economic_data,
            risk_metrics: projection.risk_metrics,
            scenario_data,
            sensitivity_data,
        })
    }
}

/// Structured export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ClimError;

    fn from_str(s: &str) -> ClimResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(ClimError::config(format!(
                "unknown export format '{other}' (expected json or yaml)"
            ))),
        }
    }
}

/// Serialize any engine output in the given format.
///
/// # Errors
///
/// Returns [`ClimError::Serialization`] if the value cannot be encoded.
pub fn export<T: Serialize>(value: &T, format: ExportFormat) -> ClimResult<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        ExportFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| ClimError::serialization(e.to_string()))
        }
    }
}

/// Render comparison rows as CSV with header `year,<scenario...>`.
///
/// Columns follow the scenario order of the first row.
///
/// # Errors
///
/// Returns [`ClimError::Serialization`] if a row lacks one of the header
/// scenarios or the writer fails.
pub fn export_comparison_csv(rows: &[ComparisonRow]) -> ClimResult<String> {
    let scenarios: Vec<&str> = rows
        .first()
        .map(|row| row.values.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(std::iter::once("year").chain(scenarios.iter().copied()))?;

    for row in rows {
        let mut record = Vec::with_capacity(scenarios.len() + 1);
        record.push(row.year.to_string());
        for name in &scenarios {
            let value = row.value(name).ok_or_else(|| {
                ClimError::serialization(format!("row {} has no '{name}' column", row.year))
            })?;
            record.push(value.to_string());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ClimError::serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ClimError::serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::SimRng;
    use crate::scenarios::comparison::ScenarioComparator;
    use crate::scenarios::generator::ScenarioKind;
    use indexmap::IndexMap;

    fn quick_config() -> EngineConfig {
        EngineConfig::builder().seed(42).paths(20).build().unwrap()
    }

    #[test]
    fn test_build_from_defaults() {
        let config = quick_config();
        let report =
            AnalysisReport::build(&config, &HistoricalData::default(), &mut SimRng::new(42))
                .unwrap();

        assert_eq!(report.temperature_data.len(), 34);
        assert_eq!(report.scenario_data.len(), 3);
        let baseline = report.scenario_data.get(ScenarioKind::Baseline).unwrap();
        assert_eq!(baseline, report.temperature_data.as_slice());

        // latest GDP 100.0 at slider 50 -> factor 1.0
        let s = report.sensitivity_data;
        assert!((s.temperature_sensitivity - 100.0).abs() < 1e-9);
        assert!((s.economic_growth_sensitivity - 80.0).abs() < 1e-9);
        assert!((s.adaptation_sensitivity - 120.0).abs() < 1e-9);
        assert!((s.technology_sensitivity - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_sensitivity_fallback_without_economics() {
        let config = quick_config();
        let historical = HistoricalData::new(
            vec![
                TimeSeriesPoint::new(2000, 14.0),
                TimeSeriesPoint::new(2010, 14.5),
            ],
            Vec::new(),
        );
        let report = AnalysisReport::build(&config, &historical, &mut SimRng::new(1)).unwrap();
        assert_eq!(report.sensitivity_data, SensitivityResult::uniform(0.1));
    }

    #[test]
    fn test_build_from_input_sector_rows_fall_back() {
        let config = quick_config();
        let input: HistoricalInput = serde_json::from_str(
            r#"{
                "temperatureData": [
                    {"year": 2000, "temperature": 14.0},
                    {"year": 2010, "temperature": 14.5}
                ],
                "economicData": [
                    {"sector": "Agriculture", "impact": "severe"},
                    {"sector": "Energy"}
                ]
            }"#,
        )
        .unwrap();
        let report =
            AnalysisReport::build_from_input(&config, &input, &mut SimRng::new(1)).unwrap();
        assert_eq!(report.sensitivity_data, SensitivityResult::uniform(0.1));
        assert_eq!(report.temperature_data.len(), 32);
        assert!(report.economic_data.iter().all(|p| !p.value.is_level()));
    }

    #[test]
    fn test_build_from_input_sector_impact_is_used() {
        let config = quick_config();
        let input: HistoricalInput = serde_json::from_str(
            r#"{
                "temperatureData": [
                    {"year": 2000, "temperature": 14.0},
                    {"year": 2010, "temperature": 14.5}
                ],
                "economicData": [{"sector": "Agriculture", "impact": 50}]
            }"#,
        )
        .unwrap();
        let report =
            AnalysisReport::build_from_input(&config, &input, &mut SimRng::new(1)).unwrap();

        // undated impact 50 at slider 50 -> factor 1.0
        let s = report.sensitivity_data;
        assert!((s.temperature_sensitivity - 50.0).abs() < 1e-9);
        assert!((s.technology_sensitivity - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_propagates_projection_error() {
        let config = quick_config();
        let historical = HistoricalData::new(vec![TimeSeriesPoint::new(2000, 14.0)], Vec::new());
        let result = AnalysisReport::build(&config, &historical, &mut SimRng::new(1));
        assert!(matches!(result, Err(ClimError::InsufficientData { .. })));
    }

    #[test]
    fn test_report_wire_keys() {
        let config = quick_config();
        let report =
            AnalysisReport::build(&config, &HistoricalData::default(), &mut SimRng::new(5))
                .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "temperatureData",
            "economicData",
            "riskMetrics",
            "scenarioData",
            "sensitivityData",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["sensitivityData"]["technology_sensitivity"].is_number());
        assert!(json["scenarioData"]["pessimistic"].is_array());
    }

    #[test]
    fn test_export_formats() {
        let metrics = RiskMetrics {
            mean: 1.0,
            var95: 2.0,
            max: 3.0,
        };
        let json = export(&metrics, ExportFormat::Json).unwrap();
        assert!(json.contains("\"var_95\": 2.0"));

        let yaml = export(&metrics, ExportFormat::Yaml).unwrap();
        assert!(yaml.contains("max_temperature: 3.0"));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!("xml".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Yaml.to_string(), "yaml");
    }

    #[test]
    fn test_comparison_csv() {
        let mut scenarios = IndexMap::new();
        scenarios.insert(
            "baseline".to_string(),
            vec![TimeSeriesPoint::new(2020, 1.0), TimeSeriesPoint::new(2030, 2.0)],
        );
        scenarios.insert(
            "optimistic".to_string(),
            vec![TimeSeriesPoint::new(2020, 1.0), TimeSeriesPoint::new(2030, 1.5)],
        );
        let rows = ScenarioComparator.compare(&scenarios).unwrap();

        let csv = export_comparison_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["year,baseline,optimistic", "2020,1,1", "2030,2,1.5"]);
    }

    #[test]
    fn test_comparison_csv_empty() {
        assert_eq!(export_comparison_csv(&[]).unwrap(), "year\n");
    }
}
