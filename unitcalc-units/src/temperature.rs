//! Temperature conversion
//!
//! Celsius, Fahrenheit and Kelvin are not multiples of a shared base, so each
//! ordered pair has its own formula.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use tracing::trace;
use unitcalc_core::{CalcError, CalcResult};

const KELVIN_OFFSET: f64 = 273.15;
const FAHRENHEIT_OFFSET: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Every unit, in menu order
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "Celsius",
            TemperatureUnit::Fahrenheit => "Fahrenheit",
            TemperatureUnit::Kelvin => "Kelvin",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    /// Parse a name or symbol, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "celsius" | "c" | "°c" | "centigrade" => Some(TemperatureUnit::Celsius),
            "fahrenheit" | "f" | "°f" => Some(TemperatureUnit::Fahrenheit),
            "kelvin" | "k" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parsing a single name fails with `UnknownUnit`. Conversions by name report
/// `UnsupportedUnitPair` instead, see [`TemperatureConverter::convert_named`].
impl FromStr for TemperatureUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CalcError::unknown_unit(s, "temperature"))
    }
}

/// Which Kelvin to Fahrenheit formula to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KelvinFahrenheit {
    /// `(v - 273.15) * 9/5 + 32`
    #[default]
    Standard,
    /// `(v - 32) * 9/5 + 273.15`, the formula of earlier releases
    Legacy,
}

impl FromStr for KelvinFahrenheit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(KelvinFahrenheit::Standard),
            "legacy" => Ok(KelvinFahrenheit::Legacy),
            other => Err(CalcError::invalid_input(format!("unknown Kelvin formula '{}'", other))
                .with_suggestion("Use standard or legacy")),
        }
    }
}

/// Pairwise temperature converter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemperatureConverter {
    kelvin_fahrenheit: KelvinFahrenheit,
}

impl TemperatureConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kelvin_fahrenheit(mut self, formula: KelvinFahrenheit) -> Self {
        self.kelvin_fahrenheit = formula;
        self
    }

    pub fn kelvin_fahrenheit(&self) -> KelvinFahrenheit {
        self.kelvin_fahrenheit
    }

    /// Convert between two temperature units. Identity when `from == to`.
    pub fn convert(&self, value: f64, from: TemperatureUnit, to: TemperatureUnit) -> CalcResult<f64> {
        use TemperatureUnit::*;

        if !value.is_finite() {
            return Err(CalcError::invalid_input(format!("{} is not a finite number", value)));
        }

        if from == to {
            return Ok(value);
        }

        let result = match (from, to) {
            (Celsius, Fahrenheit) => value * 9.0 / 5.0 + FAHRENHEIT_OFFSET,
            (Celsius, Kelvin) => value + KELVIN_OFFSET,
            (Fahrenheit, Celsius) => (value - FAHRENHEIT_OFFSET) * 5.0 / 9.0,
            (Fahrenheit, Kelvin) => (value - FAHRENHEIT_OFFSET) * 5.0 / 9.0 + KELVIN_OFFSET,
            (Kelvin, Celsius) => value - KELVIN_OFFSET,
            (Kelvin, Fahrenheit) => match self.kelvin_fahrenheit {
                KelvinFahrenheit::Standard => (value - KELVIN_OFFSET) * 9.0 / 5.0 + FAHRENHEIT_OFFSET,
                KelvinFahrenheit::Legacy => (value - FAHRENHEIT_OFFSET) * 9.0 / 5.0 + KELVIN_OFFSET,
            },
            (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => value,
        };

        if !result.is_finite() {
            return Err(CalcError::non_finite(&format!("{} {} to {}", value, from, to)));
        }
        trace!(value, %from, %to, result, "temperature conversion");
        Ok(result)
    }

    /// Convert between units given by name. A name outside
    /// {Celsius, Fahrenheit, Kelvin} on either side means the requested pair
    /// has no formula, so the error is `UnsupportedUnitPair` naming both
    /// sides rather than the `UnknownUnit` of parsing one name.
    pub fn convert_named(&self, value: f64, from: &str, to: &str) -> CalcResult<f64> {
        match (TemperatureUnit::parse(from), TemperatureUnit::parse(to)) {
            (Some(f), Some(t)) => self.convert(value, f, t),
            _ => Err(CalcError::unsupported_pair(from, to)),
        }
    }
}

/// Convert with the standard formulas
pub fn convert_temperature(value: f64, from: TemperatureUnit, to: TemperatureUnit) -> CalcResult<f64> {
    TemperatureConverter::new().convert(value, from, to)
}
