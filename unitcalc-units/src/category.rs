//! Measurement categories with a linear base unit

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use unitcalc_core::CalcError;

/// A measurement category whose units are all linear multiples of one base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Base unit: Square Meter
    Area,
    /// Base unit: Kilogram
    Weight,
    /// Base unit: Meter
    Length,
}

impl Category {
    /// Every linear category, in tab order
    pub const ALL: [Category; 3] = [Category::Area, Category::Weight, Category::Length];

    /// Display name ("Area", "Weight", "Length")
    pub fn name(&self) -> &'static str {
        match self {
            Category::Area => "Area",
            Category::Weight => "Weight",
            Category::Length => "Length",
        }
    }

    /// Name of the unit every factor in this category is relative to
    pub fn base_unit(&self) -> &'static str {
        match self {
            Category::Area => "Square Meter",
            Category::Weight => "Kilogram",
            Category::Length => "Meter",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "area" => Ok(Category::Area),
            "weight" | "mass" => Ok(Category::Weight),
            "length" | "distance" => Ok(Category::Length),
            other => Err(CalcError::invalid_input(format!("unknown category '{}'", other))
                .with_suggestion("Use area, weight or length")),
        }
    }
}
