//! unitcalc Units - Linear and Temperature Conversion
//!
//! Linear categories convert by ratio through a fixed base unit:
//! - Area (Square Meter, Square Kilometer, Square Foot, Square Inch, Acre, Hectare)
//! - Weight (Kilogram, Gram, Pound, Ounce, Tonne)
//! - Length (Meter, Kilometer, Centimeter, Millimeter, Mile, Yard, Foot, Inch)
//!
//! Temperature (Celsius, Fahrenheit, Kelvin) has no shared linear base and is
//! handled by explicit pairwise formulas.

mod category;
mod unit;
mod units;
mod convert;
mod temperature;

pub use category::Category;
pub use unit::Unit;
pub use units::{UnitRegistry, UnitTable, UNITS};
pub use convert::{convert, category_of};
pub use temperature::{KelvinFahrenheit, TemperatureConverter, TemperatureUnit, convert_temperature};
