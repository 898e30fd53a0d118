//! unitcalc - Unit Conversion and Keypad Calculator Engine

mod config;
mod context;

pub use config::{EngineConfig, ENV_DECIMALS, ENV_KELVIN_FAHRENHEIT};
pub use context::{AppContext, Tab, Theme};

pub use unitcalc_core::{CalcError, CalcResult, ErrorKind};
pub use unitcalc_units::{Category, KelvinFahrenheit, TemperatureUnit, Unit};
pub use unitcalc_calc::{Key, ScientificFn, Session, SessionState};

use tracing::debug;
use unitcalc_core::{format_fixed, format_natural, parse_number};
use unitcalc_units::{TemperatureConverter, UNITS};

/// Main unitcalc engine
#[derive(Debug, Clone, Default)]
pub struct UnitCalc {
    config: EngineConfig,
    temperature: TemperatureConverter,
}

impl UnitCalc {
    pub fn new(config: EngineConfig) -> Self {
        let decimals = config.decimals;
        let config = config.with_decimals(decimals);
        let temperature = TemperatureConverter::new().with_kelvin_fahrenheit(config.kelvin_fahrenheit);
        Self { config, temperature }
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.config = self.config.with_decimals(decimals);
        self
    }

    pub fn with_kelvin_fahrenheit(mut self, formula: KelvinFahrenheit) -> Self {
        self.config.kelvin_fahrenheit = formula;
        self.temperature = self.temperature.with_kelvin_fahrenheit(formula);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn convert_linear_unit(&self, category: Category, value: f64, from: &str, to: &str) -> CalcResult<f64> {
        unitcalc_units::convert(category, value, from, to)
    }

    /// Convert between temperature units given by name or symbol
    pub fn convert_temperature(&self, value: f64, from: &str, to: &str) -> CalcResult<f64> {
        self.temperature.convert_named(value, from, to)
    }

    pub fn evaluate_expression(&self, text: &str) -> CalcResult<f64> {
        unitcalc_calc::evaluate(text)
    }

    /// Converter tab output: the raw entry text converted and rounded, or the
    /// input error marker.
    pub fn convert_text(&self, category: Category, raw: &str, from: &str, to: &str) -> String {
        let result = parse_number(raw)
            .map_err(CalcError::from)
            .and_then(|value| self.convert_linear_unit(category, value, from, to));
        self.fixed_or_marker(result)
    }

    pub fn convert_temperature_text(&self, raw: &str, from: &str, to: &str) -> String {
        let result = parse_number(raw)
            .map_err(CalcError::from)
            .and_then(|value| self.convert_temperature(value, from, to));
        self.fixed_or_marker(result)
    }

    /// Calculator output: natural representation or the calculator error marker
    pub fn evaluate_text(&self, text: &str) -> String {
        match self.evaluate_expression(text) {
            Ok(value) => format_natural(value),
            Err(e) => {
                debug!(text, error = %e, "evaluation rejected");
                self.config.calc_error_marker.clone()
            }
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Units of a category in menu order
    pub fn units(&self, category: Category) -> &'static [Unit] {
        UNITS.by_category(category)
    }

    pub fn temperature_units(&self) -> &'static [TemperatureUnit] {
        &TemperatureUnit::ALL
    }

    /// Calculator prefix functions in dispatch order
    pub fn functions(&self) -> &'static [ScientificFn] {
        &unitcalc_calc::SCIENTIFIC_FUNCTIONS
    }

    /// A fresh calculator session using the configured error marker
    pub fn new_session(&self) -> Session {
        Session::new().with_error_marker(self.config.calc_error_marker.clone())
    }

    /// A fresh window context
    pub fn new_context(&self) -> AppContext {
        AppContext::new(&self.config)
    }

    /// Round to the configured number of decimal places
    pub fn format_fixed(&self, value: f64) -> String {
        format_fixed(value, self.config.decimals)
    }

    fn fixed_or_marker(&self, result: CalcResult<f64>) -> String {
        match result {
            Ok(value) => self.format_fixed(value),
            Err(e) => {
                debug!(error = %e, "conversion rejected");
                self.config.input_error_marker.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_text() {
        let calc = UnitCalc::default();
        assert_eq!(calc.convert_text(Category::Weight, "1000", "Gram", "Kilogram"), "1.0000");
        assert_eq!(calc.convert_text(Category::Length, " 1 ", "Mile", "Meter"), "1609.3400");
        assert_eq!(calc.convert_text(Category::Area, "1", "Hectare", "Square Meter"), "10000.0000");
    }

    #[test]
    fn test_convert_text_invalid_input() {
        let calc = UnitCalc::default();
        assert_eq!(calc.convert_text(Category::Length, "abc", "Meter", "Foot"), "Invalid Input");
        assert_eq!(calc.convert_text(Category::Length, "", "Meter", "Foot"), "Invalid Input");
        assert_eq!(calc.convert_text(Category::Length, "inf", "Meter", "Foot"), "Invalid Input");
        assert_eq!(calc.convert_text(Category::Length, "1", "Meter", "Parsec"), "Invalid Input");
    }

    #[test]
    fn test_convert_temperature_text() {
        let calc = UnitCalc::default();
        assert_eq!(calc.convert_temperature_text("100", "Celsius", "Fahrenheit"), "212.0000");
        assert_eq!(calc.convert_temperature_text("0", "Kelvin", "Fahrenheit"), "-459.6700");
        assert_eq!(calc.convert_temperature_text("x", "Celsius", "Kelvin"), "Invalid Input");

        let legacy = UnitCalc::default().with_kelvin_fahrenheit(KelvinFahrenheit::Legacy);
        assert_eq!(legacy.convert_temperature_text("0", "Kelvin", "Fahrenheit"), "215.5500");
    }

    #[test]
    fn test_decimals_setting() {
        let calc = UnitCalc::default().with_decimals(2);
        assert_eq!(calc.convert_text(Category::Weight, "1", "Pound", "Kilogram"), "0.45");
    }

    #[test]
    fn test_decimals_capped_for_any_config() {
        let literal = EngineConfig { decimals: 40, ..EngineConfig::default() };
        assert_eq!(UnitCalc::new(literal).config().decimals, 15);

        let parsed: EngineConfig = serde_json::from_str(r#"{"decimals": 99}"#).unwrap();
        let calc = UnitCalc::new(parsed);
        assert_eq!(calc.convert_text(Category::Weight, "1", "Kilogram", "Kilogram"), "1.000000000000000");
    }

    #[test]
    fn test_evaluate_text() {
        let calc = UnitCalc::default();
        assert_eq!(calc.evaluate_text("2+3*4"), "14");
        assert_eq!(calc.evaluate_text("7/2"), "3.5");
        assert_eq!(calc.evaluate_text("5/0"), "Error");
        assert_eq!(calc.evaluate_text("__import__('os')"), "Error");
    }

    #[test]
    fn test_errors_are_typed() {
        let calc = UnitCalc::default();
        let err = calc.convert_linear_unit(Category::Weight, 1.0, "Gram", "Meter").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownUnit);
        let err = calc.convert_temperature(1.0, "Celsius", "Rankine").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedUnitPair);
        let err = calc.evaluate_expression("1/0").unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_menus() {
        let calc = UnitCalc::default();
        assert_eq!(calc.categories().len(), 3);
        let weights: Vec<&str> = calc.units(Category::Weight).iter().map(|u| u.name).collect();
        assert_eq!(weights, vec!["Kilogram", "Gram", "Pound", "Ounce", "Tonne"]);
        assert_eq!(calc.temperature_units().len(), 3);
        assert_eq!(calc.functions()[0].prefix, "sin");
    }

    #[test]
    fn test_new_session_uses_marker() {
        let config = EngineConfig {
            calc_error_marker: "ERR".to_string(),
            ..EngineConfig::default()
        };
        let calc = UnitCalc::new(config);
        let mut session = calc.new_session();
        assert_eq!(session.press(Key::Equals), "ERR");
    }
}
