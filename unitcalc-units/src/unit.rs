//! Unit representation with a linear scale factor

use std::fmt;
use serde::Serialize;
use unitcalc_core::{CalcError, CalcResult};
use crate::Category;

/// A unit of a linear category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    /// Display name used in menus (e.g. "Square Foot")
    pub name: &'static str,
    /// Short symbol (e.g. "ft²")
    pub symbol: &'static str,
    /// Factor to the category's base unit (value_base = value * factor)
    pub factor: f64,
    /// Owning category
    pub category: Category,
}

impl Unit {
    pub const fn new(name: &'static str, symbol: &'static str, factor: f64, category: Category) -> Self {
        Unit { name, symbol, factor, category }
    }

    /// Check if this is the category's base unit
    pub fn is_base(&self) -> bool {
        self.factor == 1.0
    }

    /// Convert a value from this unit to the base unit
    pub fn to_base(&self, value: f64) -> f64 {
        value * self.factor
    }

    /// Convert a value from the base unit to this unit
    pub fn from_base(&self, value_base: f64) -> f64 {
        value_base / self.factor
    }

    /// Convert a value from this unit to another unit of the same category
    pub fn convert_to(&self, value: f64, target: &Unit) -> CalcResult<f64> {
        if !value.is_finite() {
            return Err(CalcError::invalid_input(format!("{} is not a finite number", value)));
        }
        if self.category != target.category {
            return Err(CalcError::unknown_unit(target.name, self.category.name()));
        }
        if self.name == target.name {
            return Ok(value);
        }

        let result = target.from_base(self.to_base(value));
        if !result.is_finite() {
            return Err(CalcError::non_finite(&format!("{} {} to {}", value, self.name, target.name)));
        }
        Ok(result)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
