//! Unit definitions organized by category

use std::collections::HashMap;
use std::sync::LazyLock;
use crate::{Category, Unit};

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// The units of one category, in menu order, with alias lookup
pub struct UnitTable {
    category: Category,
    units: Vec<Unit>,
    /// lowercase alias -> index into `units`
    aliases: HashMap<String, usize>,
}

impl UnitTable {
    fn new(category: Category) -> Self {
        UnitTable {
            category,
            units: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// All units in menu order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Unit display names in menu order
    pub fn names(&self) -> Vec<&'static str> {
        self.units.iter().map(|u| u.name).collect()
    }

    /// Get a unit by display name, symbol or alias
    pub fn get(&self, name: &str) -> Option<&Unit> {
        let name = name.trim();
        // Exact display name or symbol first
        if let Some(unit) = self.units.iter().find(|u| u.name == name || u.symbol == name) {
            return Some(unit);
        }
        self.aliases
            .get(&name.to_lowercase())
            .map(|&idx| &self.units[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn register(&mut self, name: &'static str, symbol: &'static str, factor: f64) {
        debug_assert!(factor.is_finite() && factor > 0.0, "bad factor for {}", name);
        debug_assert!(self.units.iter().all(|u| u.name != name), "duplicate unit {}", name);

        let idx = self.units.len();
        self.units.push(Unit::new(name, symbol, factor, self.category));
        self.aliases.insert(name.to_lowercase(), idx);
        self.aliases.insert(symbol.to_lowercase(), idx);
    }

    fn alias(&mut self, alias: &str, name: &str) {
        let idx = self.units.iter().position(|u| u.name == name);
        debug_assert!(idx.is_some(), "alias {} targets unregistered unit {}", alias, name);
        debug_assert!(!self.aliases.contains_key(&alias.to_lowercase()), "duplicate alias {}", alias);
        if let Some(idx) = idx {
            self.aliases.insert(alias.to_lowercase(), idx);
        }
    }
}

/// Registry of every linear category's table
pub struct UnitRegistry {
    tables: HashMap<Category, UnitTable>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            tables: HashMap::new(),
        };
        registry.register_area_units();
        registry.register_weight_units();
        registry.register_length_units();
        registry
    }

    /// The table for a category
    pub fn table(&self, category: Category) -> &UnitTable {
        // Every Category variant is registered in new()
        &self.tables[&category]
    }

    /// Get a unit of a category by name, symbol or alias
    pub fn get(&self, category: Category, name: &str) -> Option<&Unit> {
        self.table(category).get(name)
    }

    /// Units of a category in menu order
    pub fn by_category(&self, category: Category) -> &[Unit] {
        self.table(category).units()
    }

    fn insert(&mut self, table: UnitTable) {
        self.tables.insert(table.category, table);
    }

    fn register_area_units(&mut self) {
        let mut t = UnitTable::new(Category::Area);
        t.register("Square Meter", "m²", 1.0);
        t.register("Square Kilometer", "km²", 1e6);
        t.register("Square Foot", "ft²", 0.092903);
        t.register("Square Inch", "in²", 0.00064516);
        t.register("Acre", "ac", 4046.86);
        t.register("Hectare", "ha", 10000.0);

        // Aliases
        t.alias("m2", "Square Meter");
        t.alias("m^2", "Square Meter");
        t.alias("sq m", "Square Meter");
        t.alias("square meters", "Square Meter");
        t.alias("square metre", "Square Meter");
        t.alias("km2", "Square Kilometer");
        t.alias("km^2", "Square Kilometer");
        t.alias("sq km", "Square Kilometer");
        t.alias("square kilometers", "Square Kilometer");
        t.alias("ft2", "Square Foot");
        t.alias("ft^2", "Square Foot");
        t.alias("sq ft", "Square Foot");
        t.alias("square feet", "Square Foot");
        t.alias("in2", "Square Inch");
        t.alias("in^2", "Square Inch");
        t.alias("sq in", "Square Inch");
        t.alias("square inches", "Square Inch");
        t.alias("acres", "Acre");
        t.alias("hectares", "Hectare");
        self.insert(t);
    }

    fn register_weight_units(&mut self) {
        let mut t = UnitTable::new(Category::Weight);
        t.register("Kilogram", "kg", 1.0);
        t.register("Gram", "g", 0.001);
        t.register("Pound", "lb", 0.453592);
        t.register("Ounce", "oz", 0.0283495);
        t.register("Tonne", "t", 1000.0);

        // Aliases
        t.alias("kilograms", "Kilogram");
        t.alias("kilo", "Kilogram");
        t.alias("kilos", "Kilogram");
        t.alias("grams", "Gram");
        t.alias("pounds", "Pound");
        t.alias("lbs", "Pound");
        t.alias("ounces", "Ounce");
        t.alias("tonnes", "Tonne");
        t.alias("metric ton", "Tonne");
        self.insert(t);
    }

    fn register_length_units(&mut self) {
        let mut t = UnitTable::new(Category::Length);
        t.register("Meter", "m", 1.0);
        t.register("Kilometer", "km", 1000.0);
        t.register("Centimeter", "cm", 0.01);
        t.register("Millimeter", "mm", 0.001);
        t.register("Mile", "mi", 1609.34);
        t.register("Yard", "yd", 0.9144);
        t.register("Foot", "ft", 0.3048);
        t.register("Inch", "in", 0.0254);

        // Aliases
        t.alias("meters", "Meter");
        t.alias("metre", "Meter");
        t.alias("metres", "Meter");
        t.alias("kilometers", "Kilometer");
        t.alias("kilometre", "Kilometer");
        t.alias("centimeters", "Centimeter");
        t.alias("millimeters", "Millimeter");
        t.alias("miles", "Mile");
        t.alias("yards", "Yard");
        t.alias("feet", "Foot");
        t.alias("inches", "Inch");
        self.insert(t);
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
