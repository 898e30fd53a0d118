//! Linear conversion between units of one category

use tracing::trace;
use unitcalc_core::{CalcError, CalcResult};
use crate::{Category, UNITS};

/// Convert `value` from one unit to another within `category`.
///
/// `result = value * factor[from] / factor[to]`. Converting a unit to itself
/// returns `value` unchanged. Either unit missing from the category's table
/// is `UnknownUnit`; a non-finite value or result is `InvalidInput`.
pub fn convert(category: Category, value: f64, from: &str, to: &str) -> CalcResult<f64> {
    let table = UNITS.table(category);

    let from_unit = table.get(from)
        .ok_or_else(|| CalcError::unknown_unit(from, category.name()))?;
    let to_unit = table.get(to)
        .ok_or_else(|| CalcError::unknown_unit(to, category.name()))?;

    let result = from_unit.convert_to(value, to_unit)?;
    trace!(%category, value, from = from_unit.name, to = to_unit.name, result, "linear conversion");
    Ok(result)
}

/// Find the category that owns a unit name, symbol or alias
pub fn category_of(name: &str) -> Option<Category> {
    Category::ALL.into_iter().find(|&c| UNITS.table(c).contains(name))
}
