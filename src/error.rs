//! Error types for climecon.
//!
//! Every fallible operation returns `Result<T, ClimError>`; library code
//! never panics on caller input.

use thiserror::Error;

/// Result type alias for climecon operations.
pub type ClimResult<T> = Result<T, ClimError>;

/// Unified error type for all climecon operations.
///
/// Structural violations (empty fits, empty aggregations, misaligned
/// scenarios) are caller bugs and propagate. The economic-data and
/// sensitivity variants are recoverable: the sensitivity analyzer turns
/// them into a logged fallback instead of surfacing them.
#[derive(Debug, Error)]
pub enum ClimError {
    // ===== Precondition Violations =====
    /// Trend fitting attempted on empty or degenerate input.
    #[error("Insufficient data: {reason}")]
    InsufficientData {
        /// Why the input cannot be fitted.
        reason: String,
    },

    /// Aggregation attempted on zero trajectories.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Scenario comparison attempted on nothing, or on an empty series.
    #[error("Empty scenario set: {0}")]
    EmptyScenarioSet(String),

    /// Requested scenario name is not one of the known scenarios.
    #[error("Unknown scenario '{name}' (expected baseline, optimistic, pessimistic or all)")]
    UnknownScenario {
        /// The name that was requested.
        name: String,
    },

    /// A scenario lacks a year present in the reference scenario.
    #[error("Scenario '{scenario}' has no point for year {year}")]
    MissingYear {
        /// Scenario missing the year.
        scenario: String,
        /// The year that could not be found.
        year: i32,
    },

    /// Non-finite value (NaN or infinity) found in an input.
    #[error("Non-finite value detected at {location}")]
    NonFiniteValue {
        /// Where the value was found.
        location: String,
    },

    // ===== Recoverable =====
    /// Economic data is present but carries no usable value.
    #[error("Malformed economic data: {0}")]
    MalformedEconomicData(String),

    /// Sensitivity input outside `[0, 100]` or not finite.
    #[error("Invalid sensitivity value {value} (expected 0..=100)")]
    InvalidSensitivity {
        /// The rejected slider value.
        value: f64,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ClimError {
    /// Create an insufficient-data error.
    #[must_use]
    pub fn insufficient_data(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a malformed economic data error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEconomicData(message.into())
    }

    /// Create a non-finite value error.
    #[must_use]
    pub fn non_finite(location: impl Into<String>) -> Self {
        Self::NonFiniteValue {
            location: location.into(),
        }
    }

    /// Check if this error belongs to the soft-fail class.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedEconomicData(_) | Self::InvalidSensitivity { .. }
        )
    }
}

impl From<serde_json::Error> for ClimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ClimError {
    fn from(err: csv::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
