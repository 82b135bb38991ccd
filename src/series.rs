//! Time-series data model shared by every stage of the engine.
//!
//! Field names on the wire are part of the contract with the layers that
//! render engine output: temperature points use `year`/`temperature`,
//! economic points use `year`/`gdp` (level) or `year`/`impact` (delta).

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ClimError, ClimResult};

/// A single `(year, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Calendar year.
    pub year: i32,
    /// Observed or projected value.
    #[serde(rename = "temperature", alias = "value")]
    pub value: f64,
}

impl TimeSeriesPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Latest point of a series: maximum year, last in order on ties.
#[must_use]
pub fn latest(series: &[TimeSeriesPoint]) -> Option<&TimeSeriesPoint> {
    series.iter().max_by_key(|p| p.year)
}

/// Reject series containing NaN or infinite values.
///
/// # Errors
///
/// Returns [`ClimError::NonFiniteValue`] naming the first offending index.
pub fn ensure_finite(series: &[TimeSeriesPoint], label: &str) -> ClimResult<()> {
    match series.iter().position(|p| !p.value.is_finite()) {
        Some(i) => Err(ClimError::non_finite(format!("{label}[{i}]"))),
        None => Ok(()),
    }
}

/// Economic amount tagged with its semantics.
///
/// A `Level` is an aggregate (GDP-like) value; a `Delta` is an impact
/// relative to some baseline. The two are not interchangeable, so callers
/// must say which one they hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EconomicValue {
    /// Aggregate economic level (`gdp` on the wire).
    Level(f64),
    /// Impact delta (`impact` on the wire).
    Delta(f64),
}

impl EconomicValue {
    /// The raw amount regardless of semantics.
    #[must_use]
    pub const fn amount(self) -> f64 {
        match self {
            Self::Level(v) | Self::Delta(v) => v,
        }
    }

    /// Whether this is an aggregate level.
    #[must_use]
    pub const fn is_level(self) -> bool {
        matches!(self, Self::Level(_))
    }
}

/// A dated, typed economic observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EconomicRecord", into = "EconomicRecord")]
pub struct EconomicPoint {
    /// Calendar year.
    pub year: i32,
    /// Tagged economic amount.
    pub value: EconomicValue,
}

impl EconomicPoint {
    /// Create a GDP-level point.
    #[must_use]
    pub const fn level(year: i32, amount: f64) -> Self {
        Self {
            year,
            value: EconomicValue::Level(amount),
        }
    }

    /// Create an impact-delta point.
    #[must_use]
    pub const fn delta(year: i32, amount: f64) -> Self {
        Self {
            year,
            value: EconomicValue::Delta(amount),
        }
    }
}

/// A value of type `T`, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Other(IgnoredAny) => None,
        }
    }
}

/// Field deserializer that maps null or mistyped values to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<Lenient<T>>::deserialize(deserializer)?;
    Ok(value.and_then(Lenient::into_option))
}

/// Row-list deserializer: null or a non-array becomes empty, and a
/// non-object row becomes an empty record.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<EconomicRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Option<Vec<Lenient<EconomicRecord>>> = lenient(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_option().unwrap_or_default())
        .collect())
}

/// Lenient wire record for economic data.
///
/// Every field is optional because upstream providers are inconsistent:
/// some rows carry `gdp`, some `impact`, some a `sector` label and no year.
/// A field of the wrong type (`"gdp": "n/a"`) reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EconomicRecord {
    /// Calendar year, if known.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    /// Aggregate level.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub gdp: Option<f64>,
    /// Impact delta.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub impact: Option<f64>,
    /// Sector label.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub sector: Option<String>,
}

impl EconomicRecord {
    /// Typed value of this record. `gdp` wins when both fields are set.
    #[must_use]
    pub fn value(&self) -> Option<EconomicValue> {
        self.gdp
            .map(EconomicValue::Level)
            .or_else(|| self.impact.map(EconomicValue::Delta))
    }
}

impl TryFrom<EconomicRecord> for EconomicPoint {
    type Error = ClimError;

    fn try_from(record: EconomicRecord) -> ClimResult<Self> {
        let value = record
            .value()
            .ok_or_else(|| ClimError::malformed("record has neither 'gdp' nor 'impact'"))?;
        let year = record
            .year
            .ok_or_else(|| ClimError::malformed("record has no 'year'"))?;
        Ok(Self { year, value })
    }
}

impl From<EconomicPoint> for EconomicRecord {
    fn from(point: EconomicPoint) -> Self {
        let (gdp, impact) = match point.value {
            EconomicValue::Level(v) => (Some(v), None),
            EconomicValue::Delta(v) => (None, Some(v)),
        };
        Self {
            year: Some(point.year),
            gdp,
            impact,
            sector: None,
        }
    }
}

/// Historical input: a temperature series and an economic series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    /// Observed temperatures.
    #[serde(rename = "temperatureData", default)]
    pub temperature: Vec<TimeSeriesPoint>,
    /// Observed economic levels.
    #[serde(rename = "economicData", default)]
    pub economic: Vec<EconomicPoint>,
}

impl HistoricalData {
    /// Create historical data from its two series.
    #[must_use]
    pub const fn new(temperature: Vec<TimeSeriesPoint>, economic: Vec<EconomicPoint>) -> Self {
        Self {
            temperature,
            economic,
        }
    }

    /// True when there is no temperature history to fit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

/// Historical input as read from user files.
///
/// Temperatures are strict. Economic rows are kept as raw
/// [`EconomicRecord`]s so that sector-only or mistyped rows reach the
/// sensitivity fallback instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalInput {
    /// Observed temperatures.
    #[serde(rename = "temperatureData", default)]
    pub temperature: Vec<TimeSeriesPoint>,
    /// Raw economic rows.
    #[serde(
        rename = "economicData",
        default,
        deserialize_with = "lenient_records"
    )]
    pub economic: Vec<EconomicRecord>,
}

impl HistoricalInput {
    /// True when there is no temperature history to fit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// Typed historical data. Rows without a year or a numeric value are
    /// skipped.
    #[must_use]
    pub fn to_historical(&self) -> HistoricalData {
        let economic = self
            .economic
            .iter()
            .cloned()
            .enumerate()
            .filter_map(|(index, record)| match EconomicPoint::try_from(record) {
                Ok(point) => Some(point),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping economic row");
                    None
                }
            })
            .collect();
        HistoricalData::new(self.temperature.clone(), economic)
    }
}

impl From<HistoricalData> for HistoricalInput {
    fn from(data: HistoricalData) -> Self {
        Self {
            temperature: data.temperature,
            economic: data.economic.into_iter().map(EconomicRecord::from).collect(),
        }
    }
}
