//! Engine configuration

use serde::{Deserialize, Serialize};
use tracing::warn;
use unitcalc_calc::ERROR_MARKER;
use unitcalc_units::KelvinFahrenheit;

/// Environment variable selecting the Kelvin to Fahrenheit formula
pub const ENV_KELVIN_FAHRENHEIT: &str = "UNITCALC_KELVIN_FAHRENHEIT";
/// Environment variable overriding the converter decimal places
pub const ENV_DECIMALS: &str = "UNITCALC_DECIMALS";

/// Converter results never show more places than this
const MAX_DECIMALS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Decimal places shown by the converter tabs
    pub decimals: usize,
    pub kelvin_fahrenheit: KelvinFahrenheit,
    /// Shown by the converter tabs when the input is rejected
    pub input_error_marker: String,
    /// Shown by the calculator when evaluation fails
    pub calc_error_marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decimals: 4,
            kelvin_fahrenheit: KelvinFahrenheit::Standard,
            input_error_marker: "Invalid Input".to_string(),
            calc_error_marker: ERROR_MARKER.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals.min(MAX_DECIMALS);
        self
    }

    pub fn with_kelvin_fahrenheit(mut self, formula: KelvinFahrenheit) -> Self {
        self.kelvin_fahrenheit = formula;
        self
    }

    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`. Unparseable values keep the default
    /// and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_KELVIN_FAHRENHEIT) {
            match raw.parse::<KelvinFahrenheit>() {
                Ok(formula) => config.kelvin_fahrenheit = formula,
                Err(e) => warn!(var = ENV_KELVIN_FAHRENHEIT, value = %raw, error = %e, "ignoring invalid setting"),
            }
        }

        if let Some(raw) = lookup(ENV_DECIMALS) {
            match raw.trim().parse::<usize>() {
                Ok(decimals) if decimals <= MAX_DECIMALS => config.decimals = decimals,
                _ => warn!(var = ENV_DECIMALS, value = %raw, "ignoring invalid setting"),
            }
        }

        config
    }
}
